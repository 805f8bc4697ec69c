use actix_web::{HttpResponse, web};

use crate::auth::session::SessionContext;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::presentation;
use crate::render::render_deck;

/// GET /presentations/{id}/render - The owner's deck as view trees
pub async fn render(
    pool: web::Data<DbPool>,
    session: SessionContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    let detail = presentation::find_detail(&pool, &subject, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(render_deck(&detail)))
}

/// GET /present/{id} - Presentation mode for public decks, or the owner's own
pub async fn public_view(
    pool: web::Data<DbPool>,
    session: SessionContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let subject = session.subject()?;
    let detail = presentation::find_viewable(&pool, subject.as_deref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(render_deck(&detail)))
}
