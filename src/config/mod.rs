//! Run configuration module
//!
//! This module provides type-safe configuration loading from a YAML run file
//! layered with environment variables, using the `config` and `dotenvy`
//! crates. Environment overrides use the `BIAS_PROBE` prefix and nested
//! values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use bias_probe::config::AppConfig;
//!
//! let config = AppConfig::load_validated("config.yaml").expect("Failed to load configuration");
//!
//! println!("Querying {}", config.model);
//! ```

mod ai;
mod error;
mod sampling;

pub use ai::{AiConfig, ModelProvider, OPENAI_API_KEY_ENV};
pub use error::{ConfigError, ValidationError};
pub use sampling::SamplingConfig;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::generation::TaskVariant;

/// Root run configuration
///
/// The flat keys mirror the run files used by the data-generation stage.
/// Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Model name as the provider knows it
    pub model: String,

    /// Which client answers the prompts
    #[serde(default)]
    pub provider: ModelProvider,

    /// Prompt table (CSV with `ID` and `prompt` columns)
    pub prompt_data_path: PathBuf,

    /// Root folder of the per-item directory store
    pub storage_folder_path: Option<PathBuf>,

    /// Working copy of the table store
    pub storage_path: Option<PathBuf>,

    /// Instruction variant: `base`, `ibe` or `ebe`
    #[serde(default = "default_variant")]
    pub template_version: String,

    /// Acceptance vocabulary variant: `base`, `ibe` or `ebe`
    #[serde(default = "default_variant")]
    pub response_processor_version: String,

    /// Sampling parameters
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Model provider configuration
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file and environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads the YAML run file at `path`
    /// 3. Applies environment variables with `BIAS_PROBE` prefix on top
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `BIAS_PROBE__MODEL=gpt-4o` -> `model = gpt-4o`
    /// - `BIAS_PROBE__AI__TIMEOUT_SECS=60` -> `ai.timeout_secs = 60`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The run file is missing or is not valid YAML
    /// - Required keys are missing
    /// - Values cannot be parsed into expected types
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let path = path.as_ref().to_string_lossy().into_owned();
        let config = config::Config::builder()
            .add_source(config::File::new(&path, config::FileFormat::Yaml))
            .add_source(
                config::Environment::default()
                    .prefix("BIAS_PROBE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration and reject it unless it passes [`AppConfig::validate()`]
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadError` if loading fails and
    /// `ConfigError::ValidationFailed` if a value is invalid.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Required values are non-empty
    /// - Variant tags are known
    /// - Sampling ranges
    /// - Provider credentials and URLs
    ///
    /// Storage paths are checked separately, since which one is needed
    /// depends on the selected store.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("model"));
        }
        if self.prompt_data_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("prompt_data_path"));
        }
        self.prompt_variant()?;
        self.response_variant()?;
        self.sampling.validate()?;
        self.ai.validate(self.provider)?;
        Ok(())
    }

    /// Variant selecting the system instruction
    pub fn prompt_variant(&self) -> Result<TaskVariant, ValidationError> {
        Ok(TaskVariant::for_prompt(&self.template_version)?)
    }

    /// Variant selecting the acceptance vocabulary
    pub fn response_variant(&self) -> Result<TaskVariant, ValidationError> {
        Ok(TaskVariant::for_response(&self.response_processor_version)?)
    }

    /// Root folder of the directory store
    pub fn storage_folder(&self) -> Result<&Path, ValidationError> {
        non_empty(self.storage_folder_path.as_deref())
            .ok_or(ValidationError::MissingRequired("storage_folder_path"))
    }

    /// Working copy of the table store
    pub fn storage_table(&self) -> Result<&Path, ValidationError> {
        non_empty(self.storage_path.as_deref())
            .ok_or(ValidationError::MissingRequired("storage_path"))
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

fn default_variant() -> String {
    "base".to_string()
}
