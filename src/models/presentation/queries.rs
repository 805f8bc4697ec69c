use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::generation_audit::{self, NewAudit};
use crate::models::slide::{self, NewSlide};
use super::types::*;

const PRESENTATION_COLUMNS: &str =
    "p.id, p.user_id, p.title, p.description, p.thumbnail, p.is_public, p.created_at, p.updated_at";

/// Fail with NotFound unless `subject` owns the presentation.
pub async fn ensure_owned(pool: &PgPool, subject: &str, id: i64) -> Result<(), AppError> {
    let owned: Option<(i64,)> = sqlx::query_as(
        "SELECT p.id FROM presentations p JOIN users u ON u.id = p.user_id \
         WHERE p.id = $1 AND u.subject_id = $2",
    )
    .bind(id)
    .bind(subject)
    .fetch_optional(pool)
    .await?;
    owned.map(|_| ()).ok_or(AppError::NotFound)
}

/// The owner's presentations, most recently updated first.
pub async fn find_all_for_owner(pool: &PgPool, subject: &str) -> Result<Vec<PresentationSummary>, AppError> {
    let rows = sqlx::query_as::<_, PresentationSummary>(&format!(
        "SELECT {PRESENTATION_COLUMNS}, \
                (SELECT COUNT(*) FROM slides s WHERE s.presentation_id = p.id) AS slide_count \
         FROM presentations p JOIN users u ON u.id = p.user_id \
         WHERE u.subject_id = $1 \
         ORDER BY p.updated_at DESC, p.id DESC"
    ))
    .bind(subject)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, subject: &str, id: i64) -> Result<Presentation, AppError> {
    sqlx::query_as::<_, Presentation>(&format!(
        "SELECT {PRESENTATION_COLUMNS} FROM presentations p JOIN users u ON u.id = p.user_id \
         WHERE p.id = $1 AND u.subject_id = $2"
    ))
    .bind(id)
    .bind(subject)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn find_detail(pool: &PgPool, subject: &str, id: i64) -> Result<PresentationDetail, AppError> {
    let presentation = find_by_id(pool, subject, id).await?;
    let slides = slide::find_ordered(pool, id).await?;
    Ok(PresentationDetail { presentation, slides })
}

/// A presentation that is public, or owned by `subject` when one is given.
pub async fn find_viewable(pool: &PgPool, subject: Option<&str>, id: i64) -> Result<PresentationDetail, AppError> {
    let presentation = sqlx::query_as::<_, Presentation>(&format!(
        "SELECT {PRESENTATION_COLUMNS} FROM presentations p JOIN users u ON u.id = p.user_id \
         WHERE p.id = $1 AND (p.is_public OR u.subject_id = $2)"
    ))
    .bind(id)
    .bind(subject)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;
    let slides = slide::find_ordered(pool, id).await?;
    Ok(PresentationDetail { presentation, slides })
}

/// Insert a presentation with its slides and optional generation audit in
/// one transaction.
pub async fn create_deck(
    pool: &PgPool,
    user_id: i64,
    new: &NewPresentation,
    slides: &[NewSlide],
    audit: Option<&NewAudit>,
) -> Result<Presentation, AppError> {
    let mut tx = pool.begin().await?;

    let presentation = sqlx::query_as::<_, Presentation>(
        "INSERT INTO presentations AS p (user_id, title, description) VALUES ($1, $2, $3) \
         RETURNING p.id, p.user_id, p.title, p.description, p.thumbnail, p.is_public, p.created_at, p.updated_at",
    )
    .bind(user_id)
    .bind(&new.title)
    .bind(&new.description)
    .fetch_one(&mut *tx)
    .await?;

    for new_slide in slides {
        slide::insert(&mut *tx, presentation.id, new_slide).await?;
    }
    if let Some(audit) = audit {
        generation_audit::insert(&mut *tx, user_id, presentation.id, audit).await?;
    }

    tx.commit().await?;
    log::info!(
        "Created presentation {} with {} slides for user {}",
        presentation.id,
        slides.len(),
        user_id
    );
    Ok(presentation)
}

pub async fn update(pool: &PgPool, subject: &str, id: i64, patch: &PresentationPatch) -> Result<Presentation, AppError> {
    let current = find_by_id(pool, subject, id).await?;

    let title = match &patch.title {
        Some(title) if title.trim().is_empty() => {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        Some(title) => title.trim().to_string(),
        None => current.title,
    };
    let description = match &patch.description {
        Some(value) => crate::models::normalize_optional(value.as_deref()),
        None => current.description,
    };
    let thumbnail = patch.thumbnail.clone().unwrap_or(current.thumbnail);
    let is_public = patch.is_public.unwrap_or(current.is_public);

    let row = sqlx::query_as::<_, Presentation>(
        "UPDATE presentations AS p \
         SET title = $1, description = $2, thumbnail = $3, is_public = $4, updated_at = now() \
         WHERE p.id = $5 \
         RETURNING p.id, p.user_id, p.title, p.description, p.thumbnail, p.is_public, p.created_at, p.updated_at",
    )
    .bind(title)
    .bind(description)
    .bind(thumbnail)
    .bind(is_public)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;
    Ok(row)
}

/// Delete a presentation; its slides go with it through the FK cascade.
pub async fn delete(pool: &PgPool, subject: &str, id: i64) -> Result<(), AppError> {
    let result = sqlx::query(
        "DELETE FROM presentations p USING users u \
         WHERE p.id = $1 AND u.id = p.user_id AND u.subject_id = $2",
    )
    .bind(id)
    .bind(subject)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    log::info!("Deleted presentation {}", id);
    Ok(())
}
