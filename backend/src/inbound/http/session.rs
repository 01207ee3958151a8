//! Teacher sign-in state carried in the signed session cookie.
//!
//! Handlers take a [`SessionContext`] and never touch `actix_session`
//! directly. The only value stored is the authenticated teacher's id.

use std::future::{Ready, ready};

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Message returned when no principal is in the session.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Request-scoped view of the caller's session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind `user_id` to a fresh session key.
    ///
    /// The key is renewed first so a cookie issued before login never
    /// carries an authenticated principal.
    pub fn sign_in(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|err| Error::internal(format!("failed to write session: {err}")))
    }

    /// Principal stored by [`Self::sign_in`], if any.
    ///
    /// A stored value that is not a valid id is logged and treated as absent.
    pub fn principal(&self) -> Result<Option<UserId>, Error> {
        let stored = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|err| Error::internal(format!("failed to read session: {err}")))?;
        Ok(stored.and_then(|raw| {
            UserId::new(&raw)
                .inspect_err(|err| warn!(error = %err, "discarding malformed session principal"))
                .ok()
        }))
    }

    /// Principal for an authenticated route, or 401 `Unauthorized`.
    pub fn require_principal(&self) -> Result<UserId, Error> {
        self.principal()?
            .ok_or_else(|| Error::unauthorized(UNAUTHORIZED_MESSAGE))
    }

    /// Forget the principal and expire the cookie.
    pub fn sign_out(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self::new(req.get_session())))
    }
}

#[cfg(test)]
mod tests {
    use actix_http::Request;
    use actix_web::cookie::Cookie;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::test_utils::test_session_middleware;

    const TEACHER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn session_app()
    -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
        test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/sign-in/{id}",
                    web::post().to(|session: SessionContext, id: web::Path<String>| async move {
                        let id = UserId::new(id.into_inner())
                            .map_err(|err| Error::invalid_request(err.to_string()))?;
                        session.sign_in(&id)?;
                        Ok::<_, Error>(HttpResponse::NoContent())
                    }),
                )
                .route(
                    "/forge",
                    web::post().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("store raw value");
                        HttpResponse::NoContent()
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.require_principal()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                    }),
                )
                .route(
                    "/sign-out",
                    web::post().to(|session: SessionContext| async move {
                        session.sign_out();
                        HttpResponse::NoContent()
                    }),
                ),
        )
        .await
    }

    fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    async fn whoami(
        app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
        cookie: Option<Cookie<'static>>,
    ) -> ServiceResponse {
        let mut req = test::TestRequest::get().uri("/whoami");
        if let Some(cookie) = cookie {
            req = req.cookie(cookie);
        }
        test::call_service(app, req.to_request()).await
    }

    #[actix_web::test]
    async fn signed_in_principal_is_returned() {
        let app = session_app().await;
        let signed_in = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/sign-in/{TEACHER}"))
                .to_request(),
        )
        .await;
        assert_eq!(signed_in.status(), StatusCode::NO_CONTENT);

        let res = whoami(&app, Some(session_cookie(&signed_in))).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, TEACHER);
    }

    #[rstest]
    #[case::no_cookie(None)]
    #[case::malformed_principal(Some("/forge"))]
    #[actix_web::test]
    async fn missing_principal_is_unauthorized(#[case] setup: Option<&str>) {
        let app = session_app().await;
        let cookie = match setup {
            Some(uri) => {
                let res =
                    test::call_service(&app, test::TestRequest::post().uri(uri).to_request())
                        .await;
                Some(session_cookie(&res))
            }
            None => None,
        };

        let res = whoami(&app, cookie).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], UNAUTHORIZED_MESSAGE);
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn signing_out_expires_the_cookie() {
        let app = session_app().await;
        let signed_in = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/sign-in/{TEACHER}"))
                .to_request(),
        )
        .await;

        let signed_out = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sign-out")
                .cookie(session_cookie(&signed_in))
                .to_request(),
        )
        .await;
        let removal = session_cookie(&signed_out);
        assert_eq!(removal.value(), "");
    }
}
