//! Generation handlers.
//!
//! Drive pending data items through the model, validate each answer and
//! persist the outcome.

mod generate_responses;

pub use generate_responses::{
    GenerateResponsesCommand, GenerateResponsesError, GenerateResponsesHandler, GenerationReport,
    ItemOutcome, MAX_ITERATIONS,
};
