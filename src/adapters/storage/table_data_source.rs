//! Table Data Source Adapter
//!
//! Keeps answers in a `response` column of a CSV working copy at
//! `storage_path`. The first run seeds the copy from the prompt table; later
//! runs read the copy, so rows with a response are skipped. Rows whose
//! response cell is empty count as pending. Answers are matched to rows by
//! `ID`, so a table that repeats an ID is rejected.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::prompt_table::{
    write_atomic, PromptTable, ID_COLUMN, PROMPT_COLUMN, RESPONSE_COLUMN,
};
use crate::domain::foundation::ItemId;
use crate::ports::{DataItem, DataSource, DataSourceError};

/// CSV-backed storage with one `response` cell per row
#[derive(Debug)]
pub struct TableDataSource {
    prompt_path: PathBuf,
    storage_path: PathBuf,
    /// Serializes read-modify-write cycles on the working copy.
    write_lock: Mutex<()>,
}

impl TableDataSource {
    /// Create a table store
    ///
    /// # Arguments
    /// * `prompt_path` - Seed CSV with `ID` and `prompt` columns
    /// * `storage_path` - Working copy that receives the `response` column
    pub fn new<P: AsRef<Path>, S: AsRef<Path>>(prompt_path: P, storage_path: S) -> Self {
        Self {
            prompt_path: prompt_path.as_ref().to_path_buf(),
            storage_path: storage_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the working copy.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Loads the working copy, falling back to the seed table.
    async fn load(&self) -> Result<PromptTable, DataSourceError> {
        if fs::try_exists(&self.storage_path).await? {
            PromptTable::read(&self.storage_path).await
        } else {
            self.ensure_storage_dir().await?;
            PromptTable::read(&self.prompt_path).await
        }
    }

    async fn ensure_storage_dir(&self) -> Result<(), DataSourceError> {
        match self.storage_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .await
                .map_err(|e| DataSourceError::IoError(e.to_string())),
            _ => Ok(()),
        }
    }

    fn is_answered(row: &[String], response_col: Option<usize>) -> bool {
        response_col
            .and_then(|col| row.get(col))
            .is_some_and(|cell| !cell.trim().is_empty())
    }
}

#[async_trait]
impl DataSource for TableDataSource {
    async fn pending_items(&self, limit: Option<usize>) -> Result<Vec<DataItem>, DataSourceError> {
        let table = self.load().await?;
        let id_col = table.column(ID_COLUMN)?;
        let prompt_col = table.column(PROMPT_COLUMN)?;
        table.ensure_unique(id_col)?;
        let response_col = table.find_column(RESPONSE_COLUMN);

        let pending: Vec<DataItem> = table
            .rows()
            .iter()
            .filter(|row| !Self::is_answered(row, response_col))
            .take(limit.unwrap_or(usize::MAX))
            .map(|row| DataItem::new(ItemId::new(&row[id_col]), row[prompt_col].clone()))
            .collect();

        tracing::info!(
            rows = table.rows().len(),
            pending = pending.len(),
            "Selected data points"
        );
        if let Some(first) = pending.first() {
            tracing::info!(item_id = %first.id, "Starting from item");
        }

        Ok(pending)
    }

    async fn persist(&self, id: &ItemId, text: &str) -> Result<(), DataSourceError> {
        let _guard = self.write_lock.lock().await;

        let mut table = self.load().await?;
        let id_col = table.column(ID_COLUMN)?;
        table.ensure_unique(id_col)?;
        let response_col = table.ensure_column(RESPONSE_COLUMN);
        let row = table
            .find_row(id_col, id.as_str())
            .ok_or_else(|| DataSourceError::NotFound(id.clone()))?;

        table.set(row, response_col, text);
        write_atomic(&self.storage_path, &table.to_bytes()?).await?;

        tracing::info!(item_id = %id, "Content saved to 'response' column");
        Ok(())
    }

    async fn is_complete(&self, id: &ItemId) -> Result<bool, DataSourceError> {
        let table = self.load().await?;
        let id_col = table.column(ID_COLUMN)?;
        let row = table
            .find_row(id_col, id.as_str())
            .ok_or_else(|| DataSourceError::NotFound(id.clone()))?;

        Ok(Self::is_answered(
            &table.rows()[row],
            table.find_column(RESPONSE_COLUMN),
        ))
    }
}
