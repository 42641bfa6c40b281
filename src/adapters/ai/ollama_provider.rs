//! Ollama Provider - Implementation of AIProvider for a locally served model.
//!
//! Talks to Ollama's `/api/chat` endpoint with streaming disabled. Local
//! models are not metered, so responses never carry token usage.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Configuration for the Ollama provider.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Model tag as known to the Ollama server (e.g., "llama3:8b-instruct").
    pub model: String,
    /// Server URL (default: http://localhost:11434).
    pub base_url: String,
    /// Request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl OllamaConfig {
    /// Creates a configuration for `model` on the default local server.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: "http://localhost:11434".to_string(),
            timeout: None,
        }
    }

    /// Sets the server URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Ollama HTTP provider for local inference.
pub struct OllamaProvider {
    config: OllamaConfig,
    client: Client,
}

impl OllamaProvider {
    /// Creates a new provider.
    ///
    /// # Errors
    ///
    /// Returns `AIError::Network` if the HTTP client cannot be built.
    pub fn new(config: OllamaConfig) -> Result<Self, AIError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AIError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url)
    }

    fn to_ollama_request<'a>(&'a self, request: &'a CompletionRequest) -> OllamaChatRequest<'a> {
        OllamaChatRequest {
            model: &self.config.model,
            messages: request
                .messages
                .messages()
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: OllamaOptions {
                temperature: request.sampling.temperature,
                top_p: request.sampling.top_p,
                top_k: request.sampling.top_k,
                num_predict: request.sampling.max_tokens,
            },
        }
    }
}

#[async_trait]
impl AIProvider for OllamaProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let body = self.to_ollama_request(&request);

        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AIError::unavailable(format!("Ollama not reachable at {}", self.config.base_url))
                } else if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self
                            .config
                            .timeout
                            .map(|t| t.as_secs() as u32)
                            .unwrap_or_default(),
                    }
                } else {
                    AIError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                404 => AIError::InvalidRequest(format!("Model not found: {}", body)),
                500..=599 => AIError::unavailable(format!("Server error {}: {}", status, body)),
                _ => AIError::network(format!("Unexpected status {}: {}", status, body)),
            });
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        Ok(CompletionResponse {
            content: parsed.message.content,
            usage: None,
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("ollama", &self.config.model)
    }
}

/// Request body for Ollama /api/chat
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Generation parameters for Ollama.
#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_predict: u32,
}

/// Response body from Ollama /api/chat
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: Option<String>,
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}
