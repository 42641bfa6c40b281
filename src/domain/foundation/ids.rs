//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a data item.
///
/// Sources key items by the `ID` column of the prompt table. The value is
/// kept in its textual form so integer and string IDs compare the same way
/// they are written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an ItemId, trimming surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            Self(id)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_trims_whitespace() {
        let id = ItemId::new("  42 ");
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn item_id_from_integer_matches_text_form() {
        assert_eq!(ItemId::from(7u64), ItemId::from("7"));
    }

    #[test]
    fn item_id_displays_raw_value() {
        assert_eq!(ItemId::from("item-3").to_string(), "item-3");
    }

    #[test]
    fn item_id_serializes_transparently() {
        let json = serde_json::to_string(&ItemId::from("12")).unwrap();
        assert_eq!(json, "\"12\"");
    }
}
