use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::deserialize_some;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: i64,
    pub presentation_id: i64,
    #[sqlx(rename = "slide_order")]
    pub order: i32,
    pub title: Option<String>,
    pub content: serde_json::Value,
    pub notes: Option<String>,
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Slide to insert. A missing order is appended after the current last slide.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSlide {
    pub order: Option<i32>,
    pub title: Option<String>,
    pub content: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub duration: Option<i32>,
}

/// Partial update; `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlidePatch {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub title: Option<Option<String>>,
    pub content: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub duration: Option<Option<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub slide_ids: Vec<i64>,
}
