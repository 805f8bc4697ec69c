use sqlx::{PgConnection, PgPool};

use crate::errors::AppError;
use super::types::*;

/// Append an audit row. Runs on a caller-provided connection so it can
/// share the presentation's transaction.
pub async fn insert(
    conn: &mut PgConnection,
    user_id: i64,
    presentation_id: i64,
    audit: &NewAudit,
) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO generation_audits (user_id, presentation_id, kind, prompt, result, status) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(user_id)
    .bind(presentation_id)
    .bind(audit.kind)
    .bind(&audit.prompt)
    .bind(&audit.result)
    .bind(audit.status.as_str())
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn find_for_presentation(pool: &PgPool, presentation_id: i64) -> Result<Vec<GenerationAudit>, AppError> {
    let rows = sqlx::query_as::<_, GenerationAudit>(
        "SELECT id, user_id, presentation_id, kind, prompt, result, status, created_at \
         FROM generation_audits WHERE presentation_id = $1 ORDER BY created_at, id",
    )
    .bind(presentation_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
