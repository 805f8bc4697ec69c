pub mod auth_handlers;
pub mod presentation_handlers;
pub mod present_handlers;
pub mod slide_handlers;
pub mod status_handlers;

use actix_web::{middleware::from_fn, web};

use crate::auth::middleware::require_identity;
use crate::errors::AppError;

/// Register every route. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    // Public routes
    .route("/health", web::get().to(status_handlers::health))
    .route("/ai-status", web::get().to(status_handlers::ai_status))
    .route("/present/{id}", web::get().to(present_handlers::public_view))
    .route("/auth/session", web::post().to(auth_handlers::create_session))
    .route("/auth/session", web::delete().to(auth_handlers::destroy_session))
    // Protected routes
    .service(
        web::scope("")
            .wrap(from_fn(require_identity))
            .route("/presentations", web::get().to(presentation_handlers::list))
            .route("/presentations", web::post().to(presentation_handlers::create))
            .route("/presentations/{id}", web::get().to(presentation_handlers::read))
            .route("/presentations/{id}", web::patch().to(presentation_handlers::update))
            .route("/presentations/{id}", web::delete().to(presentation_handlers::delete))
            .route("/presentations/{id}/render", web::get().to(present_handlers::render))
            .route("/presentations/{id}/slides", web::get().to(slide_handlers::list))
            .route("/presentations/{id}/slides", web::post().to(slide_handlers::create))
            // /slides/reorder BEFORE /slides/{slide_id} to avoid routing conflict
            .route("/presentations/{id}/slides/reorder", web::post().to(slide_handlers::reorder))
            .route("/presentations/{id}/slides/{slide_id}", web::patch().to(slide_handlers::update))
            .route("/presentations/{id}/slides/{slide_id}", web::delete().to(slide_handlers::delete))
            .route(
                "/presentations/{id}/slides/{slide_id}/improve-notes",
                web::post().to(slide_handlers::improve_notes),
            ),
    );
}
