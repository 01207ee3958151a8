//! LanguageGems backend: teacher sessions, bulk student provisioning, and
//! class rosters.
//!
//! The crate is laid out hexagonally. [`domain`] holds the types, services,
//! and ports; [`inbound`] adapts HTTP requests onto the driving ports;
//! [`outbound`] implements the driven ports against PostgreSQL and the
//! identity provider.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
