use chrono::{DateTime, Utc};
use serde::Serialize;

pub const KIND_PRESENTATION_OUTLINE: &str = "PRESENTATION_OUTLINE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Completed,
    Failed,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Completed => "COMPLETED",
            AuditStatus::Failed => "FAILED",
        }
    }
}

/// Stored generation attempt.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GenerationAudit {
    pub id: i64,
    pub user_id: i64,
    pub presentation_id: Option<i64>,
    pub kind: String,
    pub prompt: String,
    pub result: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Audit row to be written alongside a generated presentation.
#[derive(Debug, Clone)]
pub struct NewAudit {
    pub kind: &'static str,
    pub prompt: String,
    pub result: serde_json::Value,
    pub status: AuditStatus,
}
