//! Driving port for teacher login.
//!
//! Inbound adapters call it to authenticate credentials without knowing
//! which identity provider sits behind it.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated principal id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Email accepted by [`FixtureLoginService`].
pub const FIXTURE_TEACHER_EMAIL: &str = "teacher@languagegems.test";

/// Principal id returned by [`FixtureLoginService`].
pub const FIXTURE_TEACHER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// In-memory authenticator used when no identity provider is configured.
///
/// `teacher@languagegems.test` / `password` authenticates as a fixed teacher.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.email() == FIXTURE_TEACHER_EMAIL && credentials.password() == "password" {
            UserId::new(FIXTURE_TEACHER_ID)
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
