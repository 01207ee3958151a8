//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, post, test as actix_test, web};

use crate::domain::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;

/// Path of the [`sign_in_as`] test route.
pub const SIGN_IN_PATH: &str = "/test/sign-in/{user_id}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Persist the path's principal in the session, bypassing any login port.
#[post("/test/sign-in/{user_id}")]
pub async fn sign_in_as(
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|err| crate::domain::Error::invalid_request(err.to_string()))?;
    session.sign_in(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Sign `user_id` in through [`sign_in_as`] and return the session cookie.
pub async fn session_cookie<S>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri(&SIGN_IN_PATH.replace("{user_id}", user_id.as_ref()))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "sign-in route failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
