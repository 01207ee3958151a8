//! Driven port for the external identity provider's admin API.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{IdentityRecord, NewIdentity, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider could not be reached or timed out.
        Transport { message: String } =>
            "identity provider unreachable: {message}",
        /// The provider answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "identity provider rejected the request ({status}): {message}",
        /// The provider's response could not be decoded.
        Decode { message: String } =>
            "identity provider response invalid: {message}",
    }
}

/// Admin operations on authentication identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a confirmed identity and return the stored record.
    async fn create_identity(
        &self,
        identity: &NewIdentity,
    ) -> Result<IdentityRecord, IdentityProviderError>;

    /// Metadata attached to the identity `id`, or `None` when it is unknown.
    async fn fetch_metadata(&self, id: &UserId) -> Result<Option<Value>, IdentityProviderError>;
}

/// Fixture implementation that mints identities without storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn create_identity(
        &self,
        identity: &NewIdentity,
    ) -> Result<IdentityRecord, IdentityProviderError> {
        Ok(IdentityRecord {
            id: UserId::random(),
            email: identity.email.clone(),
            metadata: identity.metadata.clone(),
        })
    }

    async fn fetch_metadata(&self, _id: &UserId) -> Result<Option<Value>, IdentityProviderError> {
        Ok(None)
    }
}
