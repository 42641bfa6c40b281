//! Domain layer containing generation logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, configuration errors)
//! - `generation` - Conversations, response classification, prompts and pricing

pub mod foundation;
pub mod generation;
