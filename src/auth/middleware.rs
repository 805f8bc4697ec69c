use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse, ResponseError,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

use super::AuthMode;
use super::session::SUBJECT_KEY;
use crate::errors::AppError;

/// Middleware function that requires a signed-in subject.
/// Anonymous requests get a 401 JSON body unless the app runs in
/// [`AuthMode::DevBypass`].
pub async fn require_identity(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();
    let has_subject = session.get::<String>(SUBJECT_KEY).unwrap_or(None).is_some();
    let bypass = req
        .app_data::<web::Data<AuthMode>>()
        .is_some_and(|mode| mode.is_bypass());

    if !has_subject && !bypass {
        let response: HttpResponse = AppError::Unauthorized.error_response();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::http::StatusCode;
    use actix_web::{App, middleware::from_fn, test};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn anonymous_request_is_rejected_when_enforced() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AuthMode::Enforced))
                .wrap(SessionMiddleware::new(CookieSessionStore::default(), Key::generate()))
                .service(web::scope("").wrap(from_fn(require_identity)).route("/p", web::get().to(ok))),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/p").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Unauthorized");
    }

    #[actix_web::test]
    async fn anonymous_request_passes_in_dev_bypass() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AuthMode::DevBypass))
                .wrap(SessionMiddleware::new(CookieSessionStore::default(), Key::generate()))
                .service(web::scope("").wrap(from_fn(require_identity)).route("/p", web::get().to(ok))),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/p").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
