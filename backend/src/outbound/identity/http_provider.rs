//! Reqwest-backed client for a GoTrue-style identity provider.
//!
//! The admin endpoints authenticate with the service key, sent both as the
//! `apikey` header and as a bearer token. Transport details stay here; the
//! domain only sees [`IdentityProviderError`] or, for logins, a domain
//! [`Error`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::dto::{CreateUserBody, PasswordGrantBody, SessionDto, UserDto};
use crate::domain::ports::{IdentityProvider, IdentityProviderError, LoginService};
use crate::domain::{Error, IdentityRecord, LoginCredentials, NewIdentity, UserId};

/// Default client-level timeout for identity provider calls.
pub const DEFAULT_IDENTITY_TIMEOUT: Duration = Duration::from_secs(10);

const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

/// Identity provider adapter speaking the GoTrue admin API.
pub struct GoTrueIdentityProvider {
    client: Client,
    base_url: Url,
    service_key: Zeroizing<String>,
}

impl GoTrueIdentityProvider {
    /// Build an adapter whose requests time out after `timeout`.
    ///
    /// `base_url` is the auth API root, such as
    /// `https://project.example/auth/v1`.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        service_key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            service_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityProviderError> {
        self.base_url
            .join(path)
            .map_err(|err| IdentityProviderError::transport(format!("invalid endpoint: {err}")))
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.service_key.as_str())
            .bearer_auth(self.service_key.as_str())
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>), IdentityProviderError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::transport(format!("timed out: {error}"))
    } else {
        IdentityProviderError::transport(error.to_string())
    }
}

fn rejected(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    IdentityProviderError::rejected(status.as_u16(), provider_message(body))
}

/// Human-readable message from a GoTrue error body.
fn provider_message(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let from_json = parsed.as_ref().and_then(|value| {
        ["msg", "message", "error_description", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::to_owned)
    });
    from_json.unwrap_or_else(|| {
        String::from_utf8_lossy(body)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(PREVIEW_CHAR_LIMIT)
            .collect()
    })
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, IdentityProviderError> {
    serde_json::from_slice(body)
        .map_err(|err| IdentityProviderError::decode(format!("invalid JSON payload: {err}")))
}

fn into_record(user: UserDto, fallback_email: &str) -> Result<IdentityRecord, IdentityProviderError> {
    let id = UserId::new(&user.id)
        .map_err(|err| IdentityProviderError::decode(format!("invalid user id: {err}")))?;
    Ok(IdentityRecord {
        id,
        email: user.email.unwrap_or_else(|| fallback_email.to_owned()),
        metadata: user.user_metadata.unwrap_or(Value::Null),
    })
}

#[async_trait]
impl IdentityProvider for GoTrueIdentityProvider {
    async fn create_identity(
        &self,
        identity: &NewIdentity,
    ) -> Result<IdentityRecord, IdentityProviderError> {
        let body = CreateUserBody {
            email: &identity.email,
            password: identity.password.expose(),
            email_confirm: true,
            user_metadata: &identity.metadata,
        };
        let request = self
            .authorised(self.client.post(self.endpoint("admin/users")?))
            .json(&body);
        let (status, payload) = self.send(request).await?;
        if !status.is_success() {
            return Err(rejected(status, &payload));
        }
        into_record(decode(&payload)?, &identity.email)
    }

    async fn fetch_metadata(&self, id: &UserId) -> Result<Option<Value>, IdentityProviderError> {
        let url = self.endpoint(&format!("admin/users/{id}"))?;
        let (status, payload) = self.send(self.authorised(self.client.get(url))).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(rejected(status, &payload));
        }
        let user: UserDto = decode(&payload)?;
        Ok(user.user_metadata)
    }
}

#[async_trait]
impl LoginService for GoTrueIdentityProvider {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let mut url = self
            .endpoint("token")
            .map_err(|err| Error::internal(err.to_string()))?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let body = PasswordGrantBody {
            email: credentials.email(),
            password: credentials.password(),
        };
        let request = self
            .client
            .post(url)
            .header("apikey", self.service_key.as_str())
            .json(&body);
        let (status, payload) = self.send(request).await.map_err(map_login_error)?;
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            debug!(status = status.as_u16(), "password grant refused");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }
        if !status.is_success() {
            return Err(map_login_error(rejected(status, &payload)));
        }
        let session: SessionDto = decode(&payload).map_err(map_login_error)?;
        UserId::new(&session.user.id)
            .map_err(|err| Error::internal(format!("identity provider returned {err}")))
    }
}

fn map_login_error(error: IdentityProviderError) -> Error {
    warn!(%error, "password grant failed");
    match error {
        IdentityProviderError::Transport { .. } => {
            Error::service_unavailable("identity provider unavailable")
        }
        other => Error::internal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    //! Non-network coverage for URL handling and response mapping.

    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::json;

    fn provider(base: &str) -> GoTrueIdentityProvider {
        GoTrueIdentityProvider::new(
            Url::parse(base).expect("base url"),
            Zeroizing::new("service-key".to_owned()),
            DEFAULT_IDENTITY_TIMEOUT,
        )
        .expect("client builds")
    }

    #[rstest]
    #[case("https://auth.example/auth/v1")]
    #[case("https://auth.example/auth/v1/")]
    fn endpoints_keep_the_base_path(#[case] base: &str) {
        let url = provider(base).endpoint("admin/users").expect("endpoint");
        assert_eq!(url.as_str(), "https://auth.example/auth/v1/admin/users");
    }

    #[rstest]
    #[case(br#"{"msg":"A user with this email address has already been registered"}"#.as_slice(), "A user with this email address has already been registered")]
    #[case(br#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#.as_slice(), "Invalid login credentials")]
    #[case(b"upstream   exploded".as_slice(), "upstream exploded")]
    fn provider_messages_prefer_json_fields(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(provider_message(body), expected);
    }

    #[rstest]
    fn rejected_errors_carry_status_and_message() {
        let err = rejected(StatusCode::UNPROCESSABLE_ENTITY, br#"{"msg":"weak password"}"#);
        assert_eq!(err, IdentityProviderError::rejected(422_u16, "weak password"));
        assert_eq!(
            err.to_string(),
            "identity provider rejected the request (422): weak password"
        );
    }

    #[rstest]
    fn created_users_decode_into_records() {
        let payload = json!({
            "id": "11111111-2222-3333-4444-555555555555",
            "email": "bobs.1@students.languagegems.com",
            "user_metadata": {"username": "BobS", "initial_password": "abcd2345"}
        });
        let user: UserDto = decode(payload.to_string().as_bytes()).expect("decodes");

        let record = into_record(user, "fallback@example.test").expect("record");

        assert_eq!(record.id.as_ref(), "11111111-2222-3333-4444-555555555555");
        assert_eq!(record.email, "bobs.1@students.languagegems.com");
        assert_eq!(record.initial_password(), Some("abcd2345"));
    }

    #[rstest]
    fn malformed_user_ids_are_decode_errors() {
        let user = UserDto {
            id: "not-a-uuid".to_owned(),
            email: None,
            user_metadata: None,
        };
        assert!(matches!(
            into_record(user, "x@example.test"),
            Err(IdentityProviderError::Decode { .. })
        ));
    }

    #[rstest]
    #[case(IdentityProviderError::transport("refused"), ErrorCode::ServiceUnavailable)]
    #[case(IdentityProviderError::decode("bad json"), ErrorCode::InternalError)]
    #[case(IdentityProviderError::rejected(500_u16, "boom"), ErrorCode::InternalError)]
    fn login_failures_map_to_domain_codes(
        #[case] error: IdentityProviderError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_login_error(error).code(), expected);
    }
}
