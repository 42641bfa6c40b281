//! Error types for the domain layer.

use thiserror::Error;

/// Run configuration that cannot be honored.
///
/// Raised while wiring a run together; none of these are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Invalid template version: {0}")]
    UnknownPromptVariant(String),

    #[error("Invalid response processor version: {0}")]
    UnknownResponseVariant(String),

    #[error("Model not found in pricing options: {0}")]
    UnpricedModel(String),
}
