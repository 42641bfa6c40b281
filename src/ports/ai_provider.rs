//! AI Provider Port - Interface for LLM provider integrations.
//!
//! This port abstracts all interactions with language models, hosted
//! (OpenAI) or locally served (Ollama), so the generation handler can query
//! a model without coupling to a specific API.
//!
//! # Design
//!
//! - One blocking-style completion per call; the caller awaits each call
//!   before issuing the next
//! - Provider-agnostic conversation format
//! - Token usage is optional: only metered providers report it
//! - Providers never retry internally; retry policy belongs to the caller
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse {
//!             content: "১".to_string(),
//!             usage: None,
//!             model: "echo".to_string(),
//!         })
//!     }
//!     // ... other methods
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::generation::Conversation;

/// Port for AI/LLM provider interactions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion for the conversation.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Sampling configuration sent with every request.
///
/// Providers forward the fields their API supports and ignore the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sampling temperature. Lower = more deterministic.
    pub temperature: f32,
    /// Top-p (nucleus) sampling threshold.
    pub top_p: f32,
    /// Top-k sampling: number of top tokens to consider.
    pub top_k: u32,
    /// Maximum tokens in the generated response.
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    /// Low temperature and a short budget: answers are a word or a digit.
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
            top_k: 40,
            max_tokens: 32,
        }
    }
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Conversation turns, system instruction first.
    pub messages: Conversation,
    /// Sampling configuration.
    pub sampling: SamplingParams,
}

impl CompletionRequest {
    /// Creates a request with default sampling.
    pub fn new(messages: Conversation) -> Self {
        Self {
            messages,
            sampling: SamplingParams::default(),
        }
    }

    /// Sets the sampling configuration.
    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }
}

/// Response from AI completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content.
    pub content: String,
    /// Token usage, present only for metered providers.
    pub usage: Option<TokenUsage>,
    /// Model that generated the response.
    pub model: String,
}

/// Token usage reported by a metered provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub input_tokens: u32,
    /// Tokens in the completion.
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai", "ollama").
    pub name: String,
    /// Model identifier (e.g., "gpt-4o", "llama3:8b").
    pub model: String,
    /// Whether responses carry token usage.
    pub metered: bool,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            metered: false,
        }
    }

    /// Sets whether the provider reports usage.
    pub fn with_metered(mut self, metered: bool) -> Self {
        self.metered = metered;
        self
    }
}

/// AI provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request (bad parameters).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
