//! In-Memory Data Source Adapter
//!
//! Holds items and persisted answers in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ItemId;
use crate::ports::{DataItem, DataSource, DataSourceError};

/// In-memory storage for items and answers
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    items: Vec<DataItem>,
    answers: Arc<RwLock<HashMap<ItemId, String>>>,
    failing_writes: Arc<RwLock<HashSet<ItemId>>>,
}

impl InMemoryDataSource {
    /// Create a source over `items`, all pending
    pub fn new(items: Vec<DataItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Mark an item as already answered
    pub async fn with_answer(self, id: impl Into<ItemId>, text: impl Into<String>) -> Self {
        self.answers.write().await.insert(id.into(), text.into());
        self
    }

    /// Make every write for `id` fail with an I/O error
    pub async fn fail_writes_for(&self, id: impl Into<ItemId>) {
        self.failing_writes.write().await.insert(id.into());
    }

    /// Get the persisted answer for an item
    pub async fn answer(&self, id: &ItemId) -> Option<String> {
        self.answers.read().await.get(id).cloned()
    }

    /// Get the number of persisted answers
    pub async fn answer_count(&self) -> usize {
        self.answers.read().await.len()
    }
}

#[async_trait]
impl DataSource for InMemoryDataSource {
    async fn pending_items(&self, limit: Option<usize>) -> Result<Vec<DataItem>, DataSourceError> {
        let answers = self.answers.read().await;
        Ok(self
            .items
            .iter()
            .filter(|item| !answers.contains_key(&item.id))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn persist(&self, id: &ItemId, text: &str) -> Result<(), DataSourceError> {
        if !self.items.iter().any(|item| &item.id == id) {
            return Err(DataSourceError::NotFound(id.clone()));
        }
        if self.failing_writes.read().await.contains(id) {
            return Err(DataSourceError::IoError(format!(
                "write refused for item {}",
                id
            )));
        }

        self.answers.write().await.insert(id.clone(), text.to_string());
        Ok(())
    }

    async fn is_complete(&self, id: &ItemId) -> Result<bool, DataSourceError> {
        Ok(self.answers.read().await.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<DataItem> {
        vec![
            DataItem::new("1", "a"),
            DataItem::new("2", "b"),
            DataItem::new("3", "c"),
        ]
    }

    #[tokio::test]
    async fn test_in_memory_persist_and_read_back() {
        let source = InMemoryDataSource::new(items());
        let id = ItemId::from("2");

        source.persist(&id, "নারী").await.unwrap();

        assert_eq!(source.answer(&id).await.as_deref(), Some("নারী"));
        assert!(source.is_complete(&id).await.unwrap());
        assert_eq!(source.answer_count().await, 1);
    }

    #[tokio::test]
    async fn test_in_memory_skips_answered_items() {
        let source = InMemoryDataSource::new(items()).with_answer("1", "x").await;

        let pending = source.pending_items(None).await.unwrap();

        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, ItemId::from("2"));
    }

    #[tokio::test]
    async fn test_in_memory_limit() {
        let source = InMemoryDataSource::new(items());
        assert_eq!(source.pending_items(Some(2)).await.unwrap().len(), 2);
        assert!(source.pending_items(Some(0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_unknown_item_not_found() {
        let source = InMemoryDataSource::new(items());
        let err = source.persist(&ItemId::from("9"), "1").await.unwrap_err();
        assert!(matches!(err, DataSourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_in_memory_injected_write_failure() {
        let source = InMemoryDataSource::new(items());
        source.fail_writes_for("3").await;

        let err = source.persist(&ItemId::from("3"), "1").await.unwrap_err();

        assert!(matches!(err, DataSourceError::IoError(_)));
        assert_eq!(source.answer_count().await, 0);
    }
}
