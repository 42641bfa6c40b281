//! Sampling configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::ports::SamplingParams;

/// Sampling parameters sent with every model query
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct SamplingConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl SamplingConfig {
    /// Validate sampling ranges
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidSampling("temperature"));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(ValidationError::InvalidSampling("top_p"));
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidSampling("max_tokens"));
        }
        Ok(())
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl From<SamplingConfig> for SamplingParams {
    fn from(config: SamplingConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_tokens: config.max_tokens,
        }
    }
}

fn default_temperature() -> f32 {
    0.1
}

fn default_top_p() -> f32 {
    0.9
}

fn default_top_k() -> u32 {
    40
}

fn default_max_tokens() -> u32 {
    32
}
