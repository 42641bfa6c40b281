//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Language model completions (hosted or local)
//! - `DataSource` - Pending work items and persisted answers

mod ai_provider;
mod data_source;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, SamplingParams,
    TokenUsage,
};
pub use data_source::{DataItem, DataSource, DataSourceError};
