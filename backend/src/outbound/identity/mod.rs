//! Identity provider outbound adapters.
//!
//! A thin HTTP implementation of the `IdentityProvider` and `LoginService`
//! ports against a GoTrue-compatible auth API.

mod dto;
mod http_provider;

pub use http_provider::{DEFAULT_IDENTITY_TIMEOUT, GoTrueIdentityProvider};
