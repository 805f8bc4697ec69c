use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use std::fmt;

/// JSON error body returned by every endpoint.
#[derive(Serialize, Debug, Clone)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    RateLimited,
    NotFound,
    Validation(String),
    Upstream(String),
    Db(sqlx::Error),
    Session(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::RateLimited => write!(f, "Too many failed attempts"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Validation(msg) => write!(f, "Validation failed: {msg}"),
            AppError::Upstream(msg) => write!(f, "Upstream error: {msg}"),
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Session(msg) => write!(f, "Session error: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Unauthorized => ApiErrorResponse {
                error: "Unauthorized".to_string(),
                details: None,
            },
            AppError::RateLimited => ApiErrorResponse {
                error: "Too many failed attempts. Please try again later.".to_string(),
                details: None,
            },
            AppError::NotFound => ApiErrorResponse {
                error: "Not found".to_string(),
                details: None,
            },
            AppError::Validation(msg) => ApiErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(msg.clone()),
            },
            AppError::Upstream(_) => {
                log::warn!("{self}");
                ApiErrorResponse {
                    error: "Upstream service error".to_string(),
                    details: None,
                }
            }
            _ => {
                log::error!("{self}");
                ApiErrorResponse {
                    error: "Internal Server Error".to_string(),
                    details: None,
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound,
            other => AppError::Db(other),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {e}"))
    }
}

impl From<actix_session::SessionInsertError> for AppError {
    fn from(e: actix_session::SessionInsertError) -> Self {
        AppError::Session(e.to_string())
    }
}

impl From<actix_session::SessionGetError> for AppError {
    fn from(e: actix_session::SessionGetError) -> Self {
        AppError::Session(e.to_string())
    }
}
