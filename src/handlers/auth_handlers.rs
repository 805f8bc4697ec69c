use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::provider::IdentityClient;
use crate::auth::rate_limit::RateLimiter;
use crate::auth::session::SessionContext;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExchange {
    pub session_id: String,
    pub token: String,
}

/// POST /auth/session - Exchange an identity provider session for a cookie
pub async fn create_session(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: SessionContext,
    identity: web::Data<IdentityClient>,
    limiter: web::Data<RateLimiter>,
    body: web::Json<SessionExchange>,
) -> Result<HttpResponse, AppError> {
    // Rate-limit check BEFORE calling the provider
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));
    if limiter.is_blocked(ip) {
        log::warn!("Session exchange from {} blocked after repeated failures", ip);
        return Err(AppError::RateLimited);
    }

    let subject = match identity.verify_session(&body.session_id, &body.token).await {
        Ok(subject) => subject,
        Err(e) => {
            limiter.record_failure(ip);
            return Err(e);
        }
    };
    limiter.clear(ip);

    let local = user::find_or_create(&pool, &subject).await?;
    session.persist_subject(&subject)?;
    log::info!("Session established for subject {}", subject);
    Ok(HttpResponse::Ok().json(local))
}

/// DELETE /auth/session - Sign out
pub async fn destroy_session(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
