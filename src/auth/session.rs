//! Cookie-session access for the verified identity-provider subject.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use std::future::{Ready, ready};

use crate::errors::AppError;

pub(crate) const SUBJECT_KEY: &str = "subject";

/// Wrapper over the actix session exposing identity operations only.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the verified subject, rotating the session id.
    pub fn persist_subject(&self, subject: &str) -> Result<(), AppError> {
        self.0.renew();
        self.0.insert(SUBJECT_KEY, subject)?;
        Ok(())
    }

    /// The signed-in subject, if any.
    pub fn subject(&self) -> Result<Option<String>, AppError> {
        let subject = self.0.get::<String>(SUBJECT_KEY)?;
        Ok(subject.filter(|s| !s.trim().is_empty()))
    }

    /// The signed-in subject, or `401 Unauthorized`.
    pub fn require_subject(&self) -> Result<String, AppError> {
        self.subject()?.ok_or(AppError::Unauthorized)
    }

    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(SessionContext::new(req.get_session())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn round_trips_subject() {
        let app = test::init_service(
            App::new()
                .wrap(SessionMiddleware::new(CookieSessionStore::default(), Key::generate()))
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_subject("user_2abc")?;
                        Ok::<_, AppError>(HttpResponse::Ok().finish())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let subject = session.require_subject()?;
                        Ok::<_, AppError>(HttpResponse::Ok().body(subject))
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|c| c.name() == "id")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        assert_eq!(test::read_body(get_res).await, "user_2abc");
    }

    #[actix_web::test]
    async fn missing_subject_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .wrap(SessionMiddleware::new(CookieSessionStore::default(), Key::generate()))
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        session.require_subject()?;
                        Ok::<_, AppError>(HttpResponse::Ok().finish())
                    }),
                ),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/require").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
