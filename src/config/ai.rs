//! Model provider configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Environment variable consulted when no OpenAI key is configured.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Model provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    /// OpenAI API base URL
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Ollama server URL
    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,

    /// Request timeout in seconds; unset waits indefinitely
    pub timeout_secs: Option<u64>,
}

/// Which client answers the prompts
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Hosted, metered chat completions
    #[default]
    OpenAI,
    /// Locally served model
    Ollama,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The configured OpenAI key, falling back to `OPENAI_API_KEY`
    pub fn resolve_openai_key(&self) -> Option<Secret<String>> {
        self.openai_api_key.clone().or_else(|| {
            std::env::var(OPENAI_API_KEY_ENV)
                .ok()
                .filter(|k| !k.is_empty())
                .map(Secret::new)
        })
    }

    /// Validate provider configuration
    pub fn validate(&self, provider: ModelProvider) -> Result<(), ValidationError> {
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }

        match provider {
            ModelProvider::OpenAI => {
                if self.resolve_openai_key().is_none() {
                    return Err(ValidationError::MissingRequired(OPENAI_API_KEY_ENV));
                }
                if !is_http_url(&self.openai_base_url) {
                    return Err(ValidationError::InvalidUrl("ai.openai_base_url"));
                }
            }
            ModelProvider::Ollama => {
                if !is_http_url(&self.ollama_base_url) {
                    return Err(ValidationError::InvalidUrl("ai.ollama_base_url"));
                }
            }
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            ollama_base_url: default_ollama_base_url(),
            timeout_secs: None,
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn with_key() -> AiConfig {
        AiConfig {
            openai_api_key: Some(Secret::new("sk-xxx".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: Some(60),
            ..Default::default()
        };
        assert_eq!(config.timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_configured_key_wins() {
        let key = with_key().resolve_openai_key().unwrap();
        assert_eq!(key.expose_secret(), "sk-xxx");
    }

    #[test]
    fn test_validation_valid_openai() {
        assert!(with_key().validate(ModelProvider::OpenAI).is_ok());
    }

    #[test]
    fn test_validation_ollama_needs_no_key() {
        let config = AiConfig::default();
        assert!(config.validate(ModelProvider::Ollama).is_ok());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = AiConfig {
            timeout_secs: Some(0),
            ..with_key()
        };
        assert!(matches!(
            config.validate(ModelProvider::OpenAI),
            Err(ValidationError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_validation_bad_url() {
        let config = AiConfig {
            ollama_base_url: "localhost:11434".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(ModelProvider::Ollama),
            Err(ValidationError::InvalidUrl("ai.ollama_base_url"))
        ));
    }

    #[test]
    fn test_provider_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            provider: ModelProvider,
        }

        let w: Wrapper = serde_json::from_str(r#"{"provider":"ollama"}"#).unwrap();
        assert_eq!(w.provider, ModelProvider::Ollama);
        let w: Wrapper = serde_json::from_str(r#"{"provider":"openai"}"#).unwrap();
        assert_eq!(w.provider, ModelProvider::OpenAI);
    }
}
