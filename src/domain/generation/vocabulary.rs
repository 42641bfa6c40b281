//! Acceptance vocabularies for each task variant.

use std::collections::HashSet;

use super::normalizer::TextNormalizer;
use super::variant::TaskVariant;

/// Gendered and religious nouns accepted as free-form answers.
pub const FREE_FORM_WORDS: &[&str] = &["ছেলে", "মেয়ে", "পুরুষ", "নারী", "হিন্দু", "মুসলিম"];

/// Option numerals for four-option prompts, Western and Bengali digits.
pub const FOUR_OPTIONS: &[&str] = &["1", "2", "3", "4", "১", "২", "৩", "৪"];

/// Option numerals for two-option prompts, Western and Bengali digits.
pub const TWO_OPTIONS: &[&str] = &["1", "2", "১", "২"];

/// Raw vocabulary entries for `variant`, before normalization.
fn variant_words(variant: TaskVariant) -> &'static [&'static str] {
    match variant {
        TaskVariant::Base => FREE_FORM_WORDS,
        TaskVariant::Ibe => FOUR_OPTIONS,
        TaskVariant::Ebe => TWO_OPTIONS,
    }
}

/// Fixed set of normalized tokens a response may contain.
///
/// Entries are normalized once at construction; the set never changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceVocabulary {
    words: HashSet<String>,
}

impl AcceptanceVocabulary {
    /// Builds a vocabulary from raw words using `normalizer`.
    pub fn new<I, S>(words: I, normalizer: &dyn TextNormalizer) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalizer.normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Builds the built-in vocabulary for `variant`.
    pub fn for_variant(variant: TaskVariant, normalizer: &dyn TextNormalizer) -> Self {
        Self::new(variant_words(variant).iter().copied(), normalizer)
    }

    /// Returns true if `token` (already normalized) is accepted.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }
}
