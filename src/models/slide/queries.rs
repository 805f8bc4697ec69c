use sqlx::{PgConnection, PgPool};
use std::collections::HashSet;

use crate::errors::AppError;
use crate::models::presentation;
use super::types::*;

const SLIDE_COLUMNS: &str =
    "s.id, s.presentation_id, s.slide_order, s.title, s.content, s.notes, s.duration, s.created_at, s.updated_at";

/// Slides of a presentation owned by `subject`, in display order. Duplicate
/// order values are tolerated and broken by id.
pub async fn find_all_for_presentation(
    pool: &PgPool,
    subject: &str,
    presentation_id: i64,
) -> Result<Vec<Slide>, AppError> {
    presentation::ensure_owned(pool, subject, presentation_id).await?;
    find_ordered(pool, presentation_id).await
}

/// Slides without an ownership check; callers must have authorised access.
pub async fn find_ordered(pool: &PgPool, presentation_id: i64) -> Result<Vec<Slide>, AppError> {
    let rows = sqlx::query_as::<_, Slide>(&format!(
        "SELECT {SLIDE_COLUMNS} FROM slides s \
         WHERE s.presentation_id = $1 \
         ORDER BY s.slide_order, s.id"
    ))
    .bind(presentation_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &PgPool,
    subject: &str,
    presentation_id: i64,
    slide_id: i64,
) -> Result<Slide, AppError> {
    sqlx::query_as::<_, Slide>(&format!(
        "SELECT {SLIDE_COLUMNS} FROM slides s \
         JOIN presentations p ON p.id = s.presentation_id \
         JOIN users u ON u.id = p.user_id \
         WHERE s.id = $1 AND s.presentation_id = $2 AND u.subject_id = $3"
    ))
    .bind(slide_id)
    .bind(presentation_id)
    .bind(subject)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Insert a slide on an existing connection (used inside transactions).
pub async fn insert(conn: &mut PgConnection, presentation_id: i64, slide: &NewSlide) -> Result<Slide, AppError> {
    let order = match slide.order {
        Some(order) => order,
        None => next_order(&mut *conn, presentation_id).await?,
    };
    let content = slide.content.clone().unwrap_or_else(|| serde_json::json!({}));

    let row = sqlx::query_as::<_, Slide>(
        "INSERT INTO slides (presentation_id, slide_order, title, content, notes, duration) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, presentation_id, slide_order, title, content, notes, duration, created_at, updated_at",
    )
    .bind(presentation_id)
    .bind(order)
    .bind(&slide.title)
    .bind(content)
    .bind(&slide.notes)
    .bind(slide.duration)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row)
}

async fn next_order(conn: &mut PgConnection, presentation_id: i64) -> Result<i32, AppError> {
    let (max,): (Option<i32>,) =
        sqlx::query_as("SELECT MAX(slide_order) FROM slides WHERE presentation_id = $1")
            .bind(presentation_id)
            .fetch_one(conn)
            .await?;
    order_after(max)
}

/// Order for a slide appended after `max`; 1 for an empty deck.
pub fn order_after(max: Option<i32>) -> Result<i32, AppError> {
    match max {
        None => Ok(1),
        Some(m) => m
            .checked_add(1)
            .ok_or_else(|| AppError::Validation("Slide order is at its maximum".to_string())),
    }
}

/// Create a slide in a presentation owned by `subject`.
pub async fn create(pool: &PgPool, subject: &str, presentation_id: i64, slide: &NewSlide) -> Result<Slide, AppError> {
    presentation::ensure_owned(pool, subject, presentation_id).await?;
    let mut conn = pool.acquire().await?;
    let created = insert(&mut conn, presentation_id, slide).await?;
    log::info!("Slide {} added to presentation {}", created.id, presentation_id);
    Ok(created)
}

pub async fn update(
    pool: &PgPool,
    subject: &str,
    presentation_id: i64,
    slide_id: i64,
    patch: &SlidePatch,
) -> Result<Slide, AppError> {
    let current = find_by_id(pool, subject, presentation_id, slide_id).await?;

    let title = patch.title.clone().unwrap_or(current.title);
    let content = patch.content.clone().unwrap_or(current.content);
    let notes = patch.notes.clone().unwrap_or(current.notes);
    let duration = patch.duration.unwrap_or(current.duration);

    let row = sqlx::query_as::<_, Slide>(
        "UPDATE slides SET title = $1, content = $2, notes = $3, duration = $4, updated_at = now() \
         WHERE id = $5 \
         RETURNING id, presentation_id, slide_order, title, content, notes, duration, created_at, updated_at",
    )
    .bind(title)
    .bind(content)
    .bind(notes)
    .bind(duration)
    .bind(slide_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;
    Ok(row)
}

/// Replace only the speaker notes.
pub async fn update_notes(
    pool: &PgPool,
    subject: &str,
    presentation_id: i64,
    slide_id: i64,
    notes: &str,
) -> Result<Slide, AppError> {
    let patch = SlidePatch {
        notes: Some(Some(notes.to_string())),
        ..Default::default()
    };
    update(pool, subject, presentation_id, slide_id, &patch).await
}

pub async fn delete(pool: &PgPool, subject: &str, presentation_id: i64, slide_id: i64) -> Result<(), AppError> {
    let result = sqlx::query(
        "DELETE FROM slides s USING presentations p, users u \
         WHERE s.id = $1 AND s.presentation_id = $2 \
           AND p.id = s.presentation_id AND u.id = p.user_id AND u.subject_id = $3",
    )
    .bind(slide_id)
    .bind(presentation_id)
    .bind(subject)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Check that `requested` names every existing slide exactly once.
pub fn validate_permutation(existing: &[i64], requested: &[i64]) -> Result<(), AppError> {
    let wanted: HashSet<i64> = requested.iter().copied().collect();
    if wanted.len() != requested.len() {
        return Err(AppError::Validation("slideIds contains duplicates".to_string()));
    }
    let have: HashSet<i64> = existing.iter().copied().collect();
    if wanted != have {
        return Err(AppError::Validation(
            "slideIds must list every slide of the presentation exactly once".to_string(),
        ));
    }
    Ok(())
}

/// Rewrite orders to 1..n following `slide_ids`, atomically.
pub async fn reorder(
    pool: &PgPool,
    subject: &str,
    presentation_id: i64,
    slide_ids: &[i64],
) -> Result<Vec<Slide>, AppError> {
    let existing: Vec<i64> = find_all_for_presentation(pool, subject, presentation_id)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();
    validate_permutation(&existing, slide_ids)?;

    let mut tx = pool.begin().await?;
    for (index, slide_id) in slide_ids.iter().enumerate() {
        sqlx::query("UPDATE slides SET slide_order = $1, updated_at = now() WHERE id = $2 AND presentation_id = $3")
            .bind(index as i32 + 1)
            .bind(slide_id)
            .bind(presentation_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    log::info!("Reordered {} slides in presentation {}", slide_ids.len(), presentation_id);
    find_ordered(pool, presentation_id).await
}
