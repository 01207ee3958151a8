//! Wire shapes of the GoTrue admin and token endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /admin/users`.
#[derive(Debug, Serialize)]
pub(super) struct CreateUserBody<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) email_confirm: bool,
    pub(super) user_metadata: &'a Value,
}

/// Body of `POST /token?grant_type=password`.
#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantBody<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

/// User object returned by the admin endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) user_metadata: Option<Value>,
}

/// Session returned by a successful password grant; only the user matters.
#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) user: UserDto,
}
