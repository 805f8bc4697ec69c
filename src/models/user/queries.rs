use chrono::Utc;
use sqlx::PgPool;

use crate::errors::AppError;
use super::types::*;

const USER_COLUMNS: &str =
    "id, subject_id, email, first_name, last_name, image_url, created_at, updated_at";

pub async fn find_by_subject(pool: &PgPool, subject: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE subject_id = $1"
    ))
    .bind(subject)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Placeholder address for users created before the provider shares a real one.
pub fn synthetic_email(subject: &str, now_millis: i64) -> String {
    format!("user-{subject}-{now_millis}@temp.com")
}

async fn insert(pool: &PgPool, subject: &str) -> Result<User, sqlx::Error> {
    let email = synthetic_email(subject, Utc::now().timestamp_millis());
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (subject_id, email) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
    ))
    .bind(subject)
    .bind(email)
    .fetch_one(pool)
    .await
}

/// Resolve the local user for a subject, creating it on first use.
///
/// Two concurrent first requests race on the unique subject constraint; the
/// loser re-reads the row the winner inserted.
pub async fn find_or_create(pool: &PgPool, subject: &str) -> Result<User, AppError> {
    if let Some(user) = find_by_subject(pool, subject).await? {
        return Ok(user);
    }

    match insert(pool, subject).await {
        Ok(user) => {
            log::info!("Created local user {} for subject {}", user.id, subject);
            Ok(user)
        }
        Err(e) => {
            log::warn!("User insert for subject {} failed ({}), retrying lookup", subject, e);
            find_by_subject(pool, subject)
                .await?
                .ok_or_else(|| AppError::Internal(format!("Could not create user for subject {subject}")))
        }
    }
}
