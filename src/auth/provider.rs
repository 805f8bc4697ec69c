//! Client for the external identity provider's session verification API.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::AppError;

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct VerifiedSession {
    user_id: String,
    status: String,
}

pub struct IdentityClient {
    http: Client,
    api_url: String,
    secret_key: Option<String>,
}

impl IdentityClient {
    pub fn new(api_url: &str, secret_key: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(IdentityClient {
            http: Client::builder().timeout(timeout).build()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            secret_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    /// Verify a provider session token and return its subject id. Anything
    /// other than an active session is reported as `Unauthorized`.
    pub async fn verify_session(&self, session_id: &str, token: &str) -> Result<String, AppError> {
        let Some(secret) = self.secret_key.as_deref() else {
            log::warn!("Session exchange attempted without IDENTITY_SECRET_KEY configured");
            return Err(AppError::Unauthorized);
        };
        if !is_valid_session_id(session_id) || token.trim().is_empty() {
            return Err(AppError::Unauthorized);
        }

        let response = self
            .http
            .post(format!("{}/sessions/{}/verify", self.api_url, session_id))
            .bearer_auth(secret)
            .json(&VerifyRequest { token })
            .send()
            .await
            .map_err(|e| {
                log::warn!("Identity provider unreachable: {}", e);
                AppError::Unauthorized
            })?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                return Err(AppError::Unauthorized);
            }
            other => {
                log::warn!("Identity provider returned {}", other);
                return Err(AppError::Unauthorized);
            }
        }

        let session: VerifiedSession = response.json().await.map_err(|e| {
            log::warn!("Unreadable identity provider response: {}", e);
            AppError::Unauthorized
        })?;
        if session.status != "active" || session.user_id.trim().is_empty() {
            return Err(AppError::Unauthorized);
        }
        Ok(session.user_id)
    }
}

/// Session ids are opaque provider tokens; only URL-safe characters are
/// accepted so they can be placed in the path.
fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 128 && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
