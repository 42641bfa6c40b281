//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port for various LLM providers.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat completions (metered)
//! - `OllamaProvider` - Locally served models via Ollama (unmetered)

mod mock_provider;
mod ollama_provider;
mod openai_provider;

pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use ollama_provider::{OllamaConfig, OllamaProvider};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
