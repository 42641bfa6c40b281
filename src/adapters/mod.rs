//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Model clients (OpenAI, Ollama, mock)
//! - `storage` - Prompt sources and answer sinks (directory, table, in-memory)

pub mod ai;
pub mod storage;

pub use ai::{MockAIProvider, OllamaConfig, OllamaProvider, OpenAIConfig, OpenAIProvider};
pub use storage::{DirectoryDataSource, InMemoryDataSource, TableDataSource};
