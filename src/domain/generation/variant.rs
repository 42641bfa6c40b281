//! Task variants shared by prompt construction and response validation.

use std::fmt;

use crate::domain::foundation::ConfigurationError;

/// Answer format a run asks for and validates against.
///
/// The same tag set selects both the system instruction and the acceptance
/// vocabulary; the run file names each choice separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskVariant {
    /// Free-form gendered/religious nouns.
    Base,
    /// Four numbered options.
    Ibe,
    /// Two numbered options.
    Ebe,
}

impl TaskVariant {
    pub const ALL: [TaskVariant; 3] = [TaskVariant::Base, TaskVariant::Ibe, TaskVariant::Ebe];

    /// Looks up a configuration tag, ignoring surrounding whitespace.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL.into_iter().find(|variant| variant.as_str() == tag)
    }

    /// Variant selecting the system instruction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::UnknownPromptVariant` for any tag other
    /// than `base`, `ibe` or `ebe`.
    pub fn for_prompt(tag: &str) -> Result<Self, ConfigurationError> {
        Self::from_tag(tag)
            .ok_or_else(|| ConfigurationError::UnknownPromptVariant(tag.trim().to_string()))
    }

    /// Variant selecting the acceptance vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::UnknownResponseVariant` for any tag
    /// other than `base`, `ibe` or `ebe`.
    pub fn for_response(tag: &str) -> Result<Self, ConfigurationError> {
        Self::from_tag(tag)
            .ok_or_else(|| ConfigurationError::UnknownResponseVariant(tag.trim().to_string()))
    }

    /// Configuration tag for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskVariant::Base => "base",
            TaskVariant::Ibe => "ibe",
            TaskVariant::Ebe => "ebe",
        }
    }
}

impl fmt::Display for TaskVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
