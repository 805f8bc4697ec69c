use actix_web::{HttpResponse, web};

use crate::auth::AuthMode;
use crate::auth::session::SessionContext;
use crate::db::DbPool;
use crate::deck::{DeckBuilder, DeckSettings};
use crate::errors::AppError;
use crate::generation::GenerationClient;
use crate::images::ImageFinder;
use crate::models::presentation::{self, CreatePresentationRequest, PresentationPatch};

/// GET /presentations - The caller's presentations, newest first
pub async fn list(
    pool: web::Data<DbPool>,
    session: SessionContext,
    mode: web::Data<AuthMode>,
) -> Result<HttpResponse, AppError> {
    let Some(subject) = session.subject()? else {
        if mode.is_bypass() {
            return Ok(HttpResponse::Ok().json(Vec::<presentation::PresentationSummary>::new()));
        }
        return Err(AppError::Unauthorized);
    };
    let presentations = presentation::find_all_for_owner(&pool, &subject).await?;
    Ok(HttpResponse::Ok().json(presentations))
}

/// POST /presentations - Create a presentation, optionally AI-generated
pub async fn create(
    pool: web::Data<DbPool>,
    session: SessionContext,
    generation: web::Data<GenerationClient>,
    images: web::Data<ImageFinder>,
    settings: web::Data<DeckSettings>,
    body: web::Json<CreatePresentationRequest>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    let builder = DeckBuilder::new(&generation, &images, *settings.get_ref());
    let created = builder.create(&pool, &subject, &body).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /presentations/{id} - Presentation with its ordered slides
pub async fn read(
    pool: web::Data<DbPool>,
    session: SessionContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    let detail = presentation::find_detail(&pool, &subject, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// PATCH /presentations/{id} - Update title, description, visibility
pub async fn update(
    pool: web::Data<DbPool>,
    session: SessionContext,
    path: web::Path<i64>,
    body: web::Json<PresentationPatch>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    let updated = presentation::update(&pool, &subject, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /presentations/{id} - Delete a presentation and its slides
pub async fn delete(
    pool: web::Data<DbPool>,
    session: SessionContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    presentation::delete(&pool, &subject, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
