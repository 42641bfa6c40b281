//! Text normalization for Bengali responses.
//!
//! Model output mixes precomposed and decomposed forms of the same
//! grapheme (for example `য়` as U+09DF or as U+09AF U+09BC). Both the
//! acceptance vocabulary and every response go through the same
//! normalizer so such differences never cause a false reject.

use unicode_normalization::UnicodeNormalization;

/// Pure text canonicalization applied before vocabulary comparison.
///
/// Implementations must be deterministic and idempotent:
/// `normalize(normalize(s)) == normalize(s)`.
pub trait TextNormalizer: Send + Sync {
    /// Returns the canonical form of `text`.
    fn normalize(&self, text: &str) -> String;
}

/// Invisible code points that carry no meaning in a short answer.
const INVISIBLE: &[char] = &['\u{200B}', '\u{2060}', '\u{FEFF}'];

/// Nukta sequences that NFKC leaves decomposed, folded to the single code
/// point most keyboards produce.
const NUKTA_FOLDS: &[(&str, &str)] = &[
    ("\u{09AF}\u{09BC}", "\u{09DF}"),
    ("\u{09A1}\u{09BC}", "\u{09DC}"),
    ("\u{09A2}\u{09BC}", "\u{09DD}"),
];

/// Normalizer for Bengali script with Western and Bengali digits.
///
/// Steps: drop invisible code points, NFKC, fold nukta sequences, collapse
/// whitespace runs to a single space and trim.
#[derive(Debug, Clone, Copy, Default)]
pub struct BanglaNormalizer;

impl BanglaNormalizer {
    /// Creates a new normalizer.
    pub fn new() -> Self {
        Self
    }
}

impl TextNormalizer for BanglaNormalizer {
    fn normalize(&self, text: &str) -> String {
        let visible: String = text.chars().filter(|c| !INVISIBLE.contains(c)).collect();
        let mut composed: String = visible.nfkc().collect();

        for (decomposed, folded) in NUKTA_FOLDS {
            if composed.contains(decomposed) {
                composed = composed.replace(decomposed, folded);
            }
        }

        composed.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
