use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::SessionContext;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::generation::GenerationClient;
use crate::models::slide::{self, NewSlide, ReorderRequest, SlidePatch};

#[derive(Debug, Default, Deserialize)]
pub struct ImproveNotesRequest {
    pub audience: Option<String>,
}

/// GET /presentations/{id}/slides - Slides in display order
pub async fn list(
    pool: web::Data<DbPool>,
    session: SessionContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    let slides = slide::find_all_for_presentation(&pool, &subject, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(slides))
}

/// POST /presentations/{id}/slides - Add a slide
pub async fn create(
    pool: web::Data<DbPool>,
    session: SessionContext,
    path: web::Path<i64>,
    body: web::Json<NewSlide>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    let created = slide::create(&pool, &subject, path.into_inner(), &body).await?;
    Ok(HttpResponse::Created().json(created))
}

/// PATCH /presentations/{id}/slides/{slide_id} - Update a slide
pub async fn update(
    pool: web::Data<DbPool>,
    session: SessionContext,
    path: web::Path<(i64, i64)>,
    body: web::Json<SlidePatch>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    let (presentation_id, slide_id) = path.into_inner();
    let updated = slide::update(&pool, &subject, presentation_id, slide_id, &body).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /presentations/{id}/slides/{slide_id} - Remove a slide
pub async fn delete(
    pool: web::Data<DbPool>,
    session: SessionContext,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    let (presentation_id, slide_id) = path.into_inner();
    slide::delete(&pool, &subject, presentation_id, slide_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /presentations/{id}/slides/reorder - Renumber slides 1..n
pub async fn reorder(
    pool: web::Data<DbPool>,
    session: SessionContext,
    path: web::Path<i64>,
    body: web::Json<ReorderRequest>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    let slides = slide::reorder(&pool, &subject, path.into_inner(), &body.slide_ids).await?;
    Ok(HttpResponse::Ok().json(slides))
}

/// POST /presentations/{id}/slides/{slide_id}/improve-notes - Rework speaker notes
pub async fn improve_notes(
    pool: web::Data<DbPool>,
    session: SessionContext,
    generation: web::Data<GenerationClient>,
    path: web::Path<(i64, i64)>,
    body: Option<web::Json<ImproveNotesRequest>>,
) -> Result<HttpResponse, AppError> {
    let subject = session.require_subject()?;
    let (presentation_id, slide_id) = path.into_inner();
    let current = slide::find_by_id(&pool, &subject, presentation_id, slide_id).await?;

    let notes = current.notes.as_deref().map(str::trim).unwrap_or_default();
    if notes.is_empty() {
        return Err(AppError::Validation("Slide has no speaker notes to improve".to_string()));
    }
    let audience = body.as_ref().and_then(|b| b.audience.as_deref());
    let improved = generation.improve_notes(notes, audience).await;

    let updated = slide::update_notes(&pool, &subject, presentation_id, slide_id, &improved).await?;
    Ok(HttpResponse::Ok().json(updated))
}
