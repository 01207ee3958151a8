//! Request middleware.
//!
//! Purpose: wrap every request with lifecycle concerns, currently trace
//! identifier scoping and completion logging.

pub mod trace;

pub use trace::Trace;
