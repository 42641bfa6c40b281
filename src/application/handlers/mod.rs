//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod generation;

pub use generation::{
    GenerateResponsesCommand, GenerateResponsesError, GenerateResponsesHandler, GenerationReport,
    ItemOutcome, MAX_ITERATIONS,
};
