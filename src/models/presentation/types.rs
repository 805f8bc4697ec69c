use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::deserialize_some;
use crate::models::slide::Slide;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List entry with the number of slides attached.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub presentation: Presentation,
    pub slide_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationDetail {
    #[serde(flatten)]
    pub presentation: Presentation,
    pub slides: Vec<Slide>,
}

/// Body of `POST /presentations`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePresentationRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default, rename = "useAI")]
    pub use_ai: bool,
    #[serde(default)]
    pub use_images: bool,
    pub topic: Option<String>,
}

/// Validated presentation fields ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPresentation {
    pub title: String,
    pub description: Option<String>,
}

/// Body of `PATCH /presentations/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub thumbnail: Option<Option<String>>,
}

impl NewPresentation {
    /// Trim and validate user input. Blank titles are rejected; a blank
    /// description is stored as NULL.
    pub fn from_request(req: &CreatePresentationRequest) -> Result<Self, crate::errors::AppError> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(crate::errors::AppError::Validation("Title is required".to_string()));
        }
        Ok(NewPresentation {
            title: title.to_string(),
            description: crate::models::normalize_optional(req.description.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn title_is_trimmed_and_required() {
        let req = CreatePresentationRequest {
            title: "   ".into(),
            ..Default::default()
        };
        assert!(matches!(NewPresentation::from_request(&req), Err(AppError::Validation(_))));

        let req = CreatePresentationRequest {
            title: "  Quarterly review ".into(),
            description: Some("  ".into()),
            ..Default::default()
        };
        let new = NewPresentation::from_request(&req).expect("valid");
        assert_eq!(new.title, "Quarterly review");
        assert_eq!(new.description, None);
    }

    #[test]
    fn create_request_reads_camel_case_flags() {
        let req: CreatePresentationRequest = serde_json::from_str(
            r#"{"title":"AI deck","useAI":true,"useImages":true,"topic":"space travel"}"#,
        )
        .expect("parse");
        assert!(req.use_ai);
        assert!(req.use_images);
        assert_eq!(req.topic.as_deref(), Some("space travel"));

        let bare: CreatePresentationRequest = serde_json::from_str(r#"{"title":"x"}"#).expect("parse");
        assert!(!bare.use_ai);
        assert!(!bare.use_images);
    }
}
