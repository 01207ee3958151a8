//! Application settings loaded via OrthoConfig.
//!
//! Every field can come from the command line, a configuration file, or a
//! `GEMS_`-prefixed environment variable. Unset values fall back to the
//! defaults documented on each accessor.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{
    DEFAULT_INITIAL_PASSWORD_LENGTH, DEFAULT_STUDENT_EMAIL_DOMAIN, ProvisioningPolicy,
};
use crate::outbound::identity::DEFAULT_IDENTITY_TIMEOUT;
use crate::outbound::persistence::{DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_POOL_SIZE, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Shortest initial password the server will generate.
pub const MIN_INITIAL_PASSWORD_LENGTH: usize = 6;

/// Problems with otherwise well-formed settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid identity provider URL {value:?}: {source}")]
    IdentityUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("identity provider URL is set but GEMS_IDENTITY_SERVICE_KEY is missing")]
    MissingServiceKey,
    #[error("initial password length must be at least {min}, got {0}", min = MIN_INITIAL_PASSWORD_LENGTH)]
    PasswordTooShort(usize),
}

/// Connection details for the identity provider.
pub struct IdentitySettings {
    pub base_url: Url,
    pub service_key: Zeroizing<String>,
    pub timeout: Duration,
}

/// Server settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GEMS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; fixture ports are used when unset.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_checkout_timeout_secs: Option<u64>,
    /// Root of the identity provider's auth API.
    pub identity_url: Option<String>,
    /// Service-role key for the identity provider's admin API.
    pub identity_service_key: Option<String>,
    /// Seconds before an identity provider call times out.
    pub identity_timeout_secs: Option<u64>,
    /// Keep initial passwords in plaintext for later read-back.
    #[ortho_config(default = true)]
    pub store_initial_password: bool,
    /// Domain for synthesised student contact addresses.
    pub student_email_domain: Option<String>,
    /// Length of generated initial passwords.
    pub initial_password_length: Option<usize>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "***"))
            .field("db_pool_size", &self.db_pool_size)
            .field("db_checkout_timeout_secs", &self.db_checkout_timeout_secs)
            .field("identity_url", &self.identity_url)
            .field(
                "identity_service_key",
                &self.identity_service_key.as_ref().map(|_| "***"),
            )
            .field("identity_timeout_secs", &self.identity_timeout_secs)
            .field("store_initial_password", &self.store_initial_password)
            .field("student_email_domain", &self.student_email_domain)
            .field("initial_password_length", &self.initial_password_length)
            .finish()
    }
}

impl AppSettings {
    /// Listen address, `0.0.0.0:8080` by default.
    ///
    /// # Errors
    /// [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Pool settings, or `None` when no database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().filter(|url| !url.trim().is_empty())?;
        let timeout = self
            .db_checkout_timeout_secs
            .map_or(DEFAULT_CHECKOUT_TIMEOUT, Duration::from_secs);
        Some(
            PoolConfig::new(url)
                .with_max_size(self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE))
                .with_connection_timeout(timeout),
        )
    }

    /// Identity provider connection, or `None` when none is configured.
    ///
    /// # Errors
    /// Fails when the URL does not parse or the service key is missing.
    pub fn identity(&self) -> Result<Option<IdentitySettings>, SettingsError> {
        let Some(raw) = self.identity_url.as_deref().filter(|url| !url.trim().is_empty()) else {
            return Ok(None);
        };
        let base_url = Url::parse(raw).map_err(|source| SettingsError::IdentityUrl {
            value: raw.to_owned(),
            source,
        })?;
        let service_key = self
            .identity_service_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SettingsError::MissingServiceKey)?;
        Ok(Some(IdentitySettings {
            base_url,
            service_key: Zeroizing::new(service_key),
            timeout: self
                .identity_timeout_secs
                .map_or(DEFAULT_IDENTITY_TIMEOUT, Duration::from_secs),
        }))
    }

    /// Provisioning policy for new students.
    ///
    /// # Errors
    /// [`SettingsError::PasswordTooShort`] below
    /// [`MIN_INITIAL_PASSWORD_LENGTH`].
    pub fn provisioning_policy(&self) -> Result<ProvisioningPolicy, SettingsError> {
        let password_length = self
            .initial_password_length
            .unwrap_or(DEFAULT_INITIAL_PASSWORD_LENGTH);
        if password_length < MIN_INITIAL_PASSWORD_LENGTH {
            return Err(SettingsError::PasswordTooShort(password_length));
        }
        Ok(ProvisioningPolicy {
            store_initial_password: self.store_initial_password,
            email_domain: self
                .student_email_domain
                .clone()
                .unwrap_or_else(|| DEFAULT_STUDENT_EMAIL_DOMAIN.to_owned()),
            password_length,
        })
    }
}
