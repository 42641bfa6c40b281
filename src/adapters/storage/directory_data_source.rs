//! Directory Data Source Adapter
//!
//! Reads prompts from a CSV table and stores one response file per item:
//! `<storage_root>/<id>/<model_tag>_response.txt`. An item is complete once
//! its response file exists, so several models can share one tree.
//!
//! Each ID names a single directory under the root. Empty IDs, `.`, `..`
//! and IDs containing a path separator are rejected, as are repeated IDs.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::prompt_table::{write_atomic, PromptTable, ID_COLUMN, PROMPT_COLUMN};
use crate::domain::foundation::ItemId;
use crate::domain::generation::model_tag;
use crate::ports::{DataItem, DataSource, DataSourceError};

/// File-per-item storage keyed by model
#[derive(Debug, Clone)]
pub struct DirectoryDataSource {
    prompt_path: PathBuf,
    storage_root: PathBuf,
    model_tag: String,
}

impl DirectoryDataSource {
    /// Create a directory store
    ///
    /// # Arguments
    /// * `prompt_path` - CSV with `ID` and `prompt` columns
    /// * `storage_root` - Root folder for per-item response directories
    /// * `model_name` - Model name; its tag prefixes every response file
    ///
    /// # Example
    /// ```ignore
    /// let source = DirectoryDataSource::new("./data/prompts.csv", "./responses", "gpt-4o");
    /// ```
    pub fn new<P: AsRef<Path>, S: AsRef<Path>>(
        prompt_path: P,
        storage_root: S,
        model_name: &str,
    ) -> Self {
        Self {
            prompt_path: prompt_path.as_ref().to_path_buf(),
            storage_root: storage_root.as_ref().to_path_buf(),
            model_tag: model_tag(model_name),
        }
    }

    /// Get the directory for a specific item
    fn item_dir(&self, id: &ItemId) -> Result<PathBuf, DataSourceError> {
        let name = id.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(is_separator) {
            return Err(DataSourceError::InvalidId(id.clone()));
        }
        Ok(self.storage_root.join(name))
    }

    /// Get the response file path for an item
    pub fn response_path(&self, id: &ItemId) -> Result<PathBuf, DataSourceError> {
        Ok(self
            .item_dir(id)?
            .join(format!("{}_response.txt", self.model_tag)))
    }

    /// Ensure directory exists
    async fn ensure_dir(&self, path: &Path) -> Result<(), DataSourceError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| DataSourceError::IoError(e.to_string()))
    }
}

#[async_trait]
impl DataSource for DirectoryDataSource {
    async fn pending_items(&self, limit: Option<usize>) -> Result<Vec<DataItem>, DataSourceError> {
        let table = PromptTable::read(&self.prompt_path).await?;
        let id_col = table.column(ID_COLUMN)?;
        let prompt_col = table.column(PROMPT_COLUMN)?;
        table.ensure_unique(id_col)?;

        tracing::info!(rows = table.rows().len(), "Selected data points");

        let mut pending = Vec::new();
        for row in table.rows() {
            if limit.is_some_and(|max| pending.len() >= max) {
                break;
            }

            let id = ItemId::new(&row[id_col]);
            if self.is_complete(&id).await? {
                tracing::info!(item_id = %id, "Response already exists");
                continue;
            }
            pending.push(DataItem::new(id, row[prompt_col].clone()));
        }

        Ok(pending)
    }

    async fn persist(&self, id: &ItemId, text: &str) -> Result<(), DataSourceError> {
        self.ensure_dir(&self.item_dir(id)?).await?;

        let path = self.response_path(id)?;
        write_atomic(&path, text.as_bytes()).await?;

        tracing::info!(item_id = %id, path = %path.display(), "Content saved to file");
        Ok(())
    }

    async fn is_complete(&self, id: &ItemId) -> Result<bool, DataSourceError> {
        fs::try_exists(self.response_path(id)?)
            .await
            .map_err(|e| DataSourceError::IoError(e.to_string()))
    }
}

/// Path separators of any platform.
fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}
