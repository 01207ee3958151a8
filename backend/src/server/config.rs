//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use backend::domain::ProvisioningPolicy;
use backend::outbound::persistence::DbPool;
use backend::settings::IdentitySettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity: Option<IdentitySettings>,
    pub(crate) policy: ProvisioningPolicy,
}

impl ServerConfig {
    /// Construct a server configuration from session settings.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            identity: None,
            policy: ProvisioningPolicy::default(),
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    ///
    /// Without one the server runs against fixture repositories, which own
    /// no classes, so provisioning requests are refused with 403.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Use the identity provider at `identity` for account creation and
    /// teacher logins.
    #[must_use]
    pub fn with_identity(mut self, identity: IdentitySettings) -> Self {
        self.identity = Some(identity);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ProvisioningPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
