//! bias-probe - Response validation and retry pipeline for bias probing
//!
//! This crate queries language models with bias-probing prompts, checks each
//! short categorical answer against a fixed vocabulary, retries once with a
//! corrective turn and persists the final answer so runs can resume.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
