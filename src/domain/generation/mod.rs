//! Generation domain - conversations, response validation and pricing.
//!
//! Everything here is pure: no I/O, no provider calls. The generation
//! handler combines these pieces with the model and data ports.

mod classifier;
mod conversation;
mod model_tag;
mod normalizer;
mod pricing;
mod prompt;
mod variant;
mod vocabulary;

pub use classifier::{Classification, ClassificationOutcome, ResponseClassifier};
pub use conversation::{Conversation, Message, MessageRole};
pub use model_tag::model_tag;
pub use normalizer::{BanglaNormalizer, TextNormalizer};
pub use pricing::{CostReport, CostTracker, ModelPricing};
pub use prompt::{ChatPromptBuilder, PromptBuilder, REFINEMENT_INSTRUCTION};
pub use variant::TaskVariant;
pub use vocabulary::{AcceptanceVocabulary, FOUR_OPTIONS, FREE_FORM_WORDS, TWO_OPTIONS};
