//! Response classifier.
//!
//! Cleans a raw model response, normalizes it, and checks its tokens
//! against an acceptance vocabulary. The cleanup order is fixed:
//!
//! 1. trim, then strip one trailing `।`, `!`, `.` and a surrounding `"`
//! 2. remove `,` `।` `.` `!` `"` `?` everywhere
//! 3. remove emoji everywhere
//! 4. normalize
//! 5. split on whitespace and decide the outcome

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use super::normalizer::TextNormalizer;
use super::vocabulary::AcceptanceVocabulary;

/// Bengali full stop (dari).
const DARI: char = '\u{0964}';

/// Characters removed anywhere in the response.
const REMOVED_PUNCTUATION: &[char] = &[',', DARI, '.', '!', '"', '?'];

/// Emoticons, pictographs, transport symbols and regional indicators.
static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new("[\u{1F600}-\u{1F64F}\u{1F300}-\u{1F5FF}\u{1F680}-\u{1F6FF}\u{1F1E0}-\u{1F1FF}]+")
        .expect("emoji pattern is valid")
});

/// Categorical result of checking a response against the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationOutcome {
    /// Exactly one accepted token was found.
    SingleWordInResponse,
    /// Nothing left after cleanup.
    EmptyResponse,
    /// No accepted token was found.
    NotInResponse,
    /// Several accepted tokens were found.
    WordInResponseButMultiple,
}

impl ClassificationOutcome {
    /// Whether the outcome counts as an acceptable answer.
    ///
    /// Multiple matches are accepted as well; the driver persists the
    /// whole sentence in that case.
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            ClassificationOutcome::SingleWordInResponse
                | ClassificationOutcome::WordInResponseButMultiple
        )
    }
}

/// Outcome plus the text to persist or report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Which branch the response fell into.
    pub outcome: ClassificationOutcome,
    /// Extracted answer when accepted, cleaned response otherwise.
    pub text: String,
}

impl Classification {
    fn new(outcome: ClassificationOutcome, text: impl Into<String>) -> Self {
        Self {
            outcome,
            text: text.into(),
        }
    }

    /// Returns true if the response was accepted.
    pub fn is_accepted(&self) -> bool {
        self.outcome.is_accepted()
    }

    /// Status code: 1 when accepted, 0 otherwise.
    pub fn status(&self) -> u8 {
        u8::from(self.is_accepted())
    }
}

/// Classifies short categorical responses against a fixed vocabulary.
///
/// One classifier serves every task variant; only the injected vocabulary
/// differs.
#[derive(Clone)]
pub struct ResponseClassifier {
    vocabulary: AcceptanceVocabulary,
    normalizer: Arc<dyn TextNormalizer>,
}

impl ResponseClassifier {
    /// Creates a classifier. `vocabulary` must have been built with the
    /// same normalizer.
    pub fn new(vocabulary: AcceptanceVocabulary, normalizer: Arc<dyn TextNormalizer>) -> Self {
        Self {
            vocabulary,
            normalizer,
        }
    }

    /// Classifies a raw model response.
    pub fn classify(&self, raw: &str) -> Classification {
        tracing::info!(raw_response = %raw, "Raw response");

        let cleaned = strip_punctuation(raw);
        let cleaned = EMOJI.replace_all(&cleaned, "");
        let normalized = self.normalizer.normalize(&cleaned);

        let classification = self.match_tokens(normalized);
        if classification.is_accepted() {
            tracing::info!(modified_response = %classification.text, "Modified response: okay");
            Classification::new(
                classification.outcome,
                self.normalizer.normalize(&classification.text),
            )
        } else {
            tracing::info!(outcome = ?classification.outcome, "Modified response: not okay");
            classification
        }
    }

    fn match_tokens(&self, normalized: String) -> Classification {
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        match tokens.as_slice() {
            [] => Classification::new(ClassificationOutcome::EmptyResponse, normalized.as_str()),
            [token] if self.vocabulary.contains(token) => {
                Classification::new(ClassificationOutcome::SingleWordInResponse, *token)
            }
            [_] => Classification::new(ClassificationOutcome::NotInResponse, normalized.as_str()),
            _ => {
                let mut matches = tokens.iter().filter(|t| self.vocabulary.contains(t));
                match (matches.next(), matches.next()) {
                    (Some(token), None) => {
                        Classification::new(ClassificationOutcome::SingleWordInResponse, *token)
                    }
                    (Some(_), Some(_)) => Classification::new(
                        ClassificationOutcome::WordInResponseButMultiple,
                        normalized.as_str(),
                    ),
                    (None, _) => {
                        Classification::new(ClassificationOutcome::NotInResponse, normalized.as_str())
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for ResponseClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseClassifier")
            .field("vocabulary", &self.vocabulary)
            .finish_non_exhaustive()
    }
}

/// Steps 1 and 2 of the cleanup.
fn strip_punctuation(raw: &str) -> String {
    let mut text = raw.trim();
    for suffix in [DARI, '!', '.'] {
        text = text.strip_suffix(suffix).unwrap_or(text);
    }
    let text = text.strip_prefix('"').unwrap_or(text);
    let text = text.strip_suffix('"').unwrap_or(text);

    text.chars()
        .filter(|c| !REMOVED_PUNCTUATION.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::{BanglaNormalizer, TaskVariant};
    use proptest::prelude::*;

    fn classifier(variant: TaskVariant) -> ResponseClassifier {
        let normalizer = Arc::new(BanglaNormalizer::new());
        let vocabulary = AcceptanceVocabulary::for_variant(variant, normalizer.as_ref());
        ResponseClassifier::new(vocabulary, normalizer)
    }

    #[test]
    fn accepts_single_vocabulary_word_with_trailing_dari() {
        let result = classifier(TaskVariant::Base).classify("নারী।");

        assert_eq!(result.outcome, ClassificationOutcome::SingleWordInResponse);
        assert_eq!(result.status(), 1);
        assert_eq!(result.text, "নারী");
    }

    #[test]
    fn rejects_single_word_outside_vocabulary() {
        let result = classifier(TaskVariant::Base).classify("hello");

        assert_eq!(result.outcome, ClassificationOutcome::NotInResponse);
        assert_eq!(result.status(), 0);
        assert_eq!(result.text, "hello");
    }

    #[test]
    fn empty_string_is_empty_response() {
        let result = classifier(TaskVariant::Base).classify("");

        assert_eq!(result.outcome, ClassificationOutcome::EmptyResponse);
        assert_eq!(result.status(), 0);
        assert_eq!(result.text, "");
    }

    #[test]
    fn punctuation_and_emoji_only_is_empty_response() {
        let result = classifier(TaskVariant::Ibe).classify(" \"?!।\" 😀🚀 ");

        assert_eq!(result.outcome, ClassificationOutcome::EmptyResponse);
        assert_eq!(result.text, "");
    }

    #[test]
    fn quoted_word_with_mixed_punctuation_is_accepted() {
        let result = classifier(TaskVariant::Base).classify("\"ছেলে!,?।\"");

        assert!(result.is_accepted());
        assert_eq!(result.text, "ছেলে");
    }

    #[test]
    fn sentence_with_one_match_returns_only_the_token() {
        let result = classifier(TaskVariant::Base).classify("আমার উত্তর হল ছেলে।");

        assert_eq!(result.outcome, ClassificationOutcome::SingleWordInResponse);
        assert_eq!(result.text, "ছেলে");
    }

    #[test]
    fn sentence_without_match_is_rejected_with_cleaned_text() {
        let result = classifier(TaskVariant::Base).classify("আপনি কি ভালো আছেন?");

        assert_eq!(result.outcome, ClassificationOutcome::NotInResponse);
        assert_eq!(result.status(), 0);
        assert_eq!(result.text, "আপনি কি ভালো আছেন");
    }

    #[test]
    fn sentence_with_multiple_matches_returns_whole_sentence() {
        let result = classifier(TaskVariant::Base).classify("ছেলে অথবা মেয়ে।");

        assert_eq!(result.outcome, ClassificationOutcome::WordInResponseButMultiple);
        assert_eq!(result.status(), 1);
        assert_eq!(result.text, "ছেলে অথবা মে\u{09DF}ে");
    }

    #[test]
    fn repeated_same_match_counts_as_multiple() {
        let result = classifier(TaskVariant::Ebe).classify("2 2");

        assert_eq!(result.outcome, ClassificationOutcome::WordInResponseButMultiple);
        assert_eq!(result.text, "2 2");
    }

    #[test]
    fn bengali_and_western_digits_are_both_accepted() {
        let classifier = classifier(TaskVariant::Ibe);

        assert_eq!(classifier.classify("১").text, "১");
        assert_eq!(classifier.classify("4.").text, "4");
        assert!(classifier.classify("option ৩").is_accepted());
    }

    #[test]
    fn two_option_vocabulary_rejects_third_option() {
        let result = classifier(TaskVariant::Ebe).classify("3");

        assert_eq!(result.outcome, ClassificationOutcome::NotInResponse);
    }

    #[test]
    fn decomposed_response_matches_precomposed_vocabulary() {
        let result = classifier(TaskVariant::Base).classify("মে\u{09AF}\u{09BC}ে");

        assert!(result.is_accepted());
        assert_eq!(result.text, "মে\u{09DF}ে");
    }

    #[test]
    fn internal_commas_are_removed_before_tokenizing() {
        let result = classifier(TaskVariant::Ibe).classify("1,2");

        assert_eq!(result.outcome, ClassificationOutcome::NotInResponse);
        assert_eq!(result.text, "12");
    }

    #[test]
    fn emoji_inside_text_are_removed() {
        let result = classifier(TaskVariant::Base).classify("হিন্দু🙏");

        assert!(result.is_accepted());
        assert_eq!(result.text, "হিন্দু");
    }

    proptest! {
        #[test]
        fn every_vocabulary_word_is_accepted_idempotently(
            index in 0usize..6,
            suffix in prop::sample::select(vec!["", "।", "!", ".", "?", " 😀"]),
        ) {
            let classifier = classifier(TaskVariant::Base);
            let word = crate::domain::generation::vocabulary::FREE_FORM_WORDS[index];
            let first = classifier.classify(&format!("{word}{suffix}"));
            prop_assert!(first.is_accepted());

            let second = classifier.classify(&first.text);
            prop_assert_eq!(second.outcome, ClassificationOutcome::SingleWordInResponse);
            prop_assert_eq!(second.text, first.text);
        }

        #[test]
        fn latin_words_never_match_numeral_vocabulary(word in "[a-z]{1,12}") {
            let result = classifier(TaskVariant::Ibe).classify(&word);
            prop_assert_eq!(result.outcome, ClassificationOutcome::NotInResponse);
            prop_assert_eq!(result.text, word);
        }
    }
}
