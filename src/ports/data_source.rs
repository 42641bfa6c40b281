//! Data Source Port - Interface for reading work items and persisting answers.
//!
//! A source owns its own resumability contract: items whose answer has
//! already been durably written are never returned as pending again.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ItemId;

/// One unit of work: a prompt and its stable ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    pub id: ItemId,
    pub prompt: String,
}

impl DataItem {
    /// Creates a new data item.
    pub fn new(id: impl Into<ItemId>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
        }
    }
}

/// Errors that can occur during data source operations
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Duplicate item ID in prompt table: {0}")]
    DuplicateId(ItemId),

    #[error("Item ID '{0}' cannot name a storage entry")]
    InvalidId(ItemId),

    #[error("Missing column '{0}' in prompt table")]
    MissingColumn(&'static str),

    #[error("Table error: {0}")]
    TableError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for DataSourceError {
    fn from(err: std::io::Error) -> Self {
        DataSourceError::IoError(err.to_string())
    }
}

impl From<csv::Error> for DataSourceError {
    fn from(err: csv::Error) -> Self {
        DataSourceError::TableError(err.to_string())
    }
}

/// Port for reading pending items and persisting final answers
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Items that have no persisted answer yet, in source order.
    ///
    /// # Arguments
    /// * `limit` - Maximum number of items to return; `None` returns all
    ///
    /// # Errors
    /// Returns `DataSourceError` if the underlying table cannot be read
    async fn pending_items(&self, limit: Option<usize>) -> Result<Vec<DataItem>, DataSourceError>;

    /// Persist the final answer for an item, replacing any previous one.
    ///
    /// Writes are atomic: a concurrent reader sees either the old or the
    /// new content, never a partial write.
    ///
    /// # Errors
    /// Returns `DataSourceError` if the write fails; callers log and drop it
    async fn persist(&self, id: &ItemId, text: &str) -> Result<(), DataSourceError>;

    /// Check whether an item already has a persisted answer
    async fn is_complete(&self, id: &ItemId) -> Result<bool, DataSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_item_converts_id() {
        let item = DataItem::new("3", "prompt");
        assert_eq!(item.id, ItemId::from(3u64));
        assert_eq!(item.prompt, "prompt");
    }

    #[test]
    fn data_source_error_not_found() {
        let err = DataSourceError::NotFound(ItemId::from("9"));
        assert!(err.to_string().contains("Item not found: 9"));
    }

    #[test]
    fn data_source_error_names_offending_id() {
        let err = DataSourceError::DuplicateId(ItemId::from("4"));
        assert_eq!(err.to_string(), "Duplicate item ID in prompt table: 4");

        let err = DataSourceError::InvalidId(ItemId::from(".."));
        assert_eq!(err.to_string(), "Item ID '..' cannot name a storage entry");
    }

    #[test]
    fn data_source_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DataSourceError = io.into();
        assert!(matches!(err, DataSourceError::IoError(_)));
    }
}
