//! Configuration error types

use thiserror::Error;

use crate::domain::foundation::ConfigurationError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid sampling parameter: {0}")]
    InvalidSampling(&'static str),

    #[error(transparent)]
    Domain(#[from] ConfigurationError),
}
