//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers and error types that form the vocabulary of the
//! bias-probe domain.

mod errors;
mod ids;

pub use errors::ConfigurationError;
pub use ids::ItemId;
