//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel.
//! - **identity**: HTTP client for the identity provider's admin and token
//!   endpoints.
//!
//! Adapters translate between domain types and infrastructure
//! representations and hold no business logic.

pub mod identity;
pub mod persistence;
