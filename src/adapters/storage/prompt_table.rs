//! CSV prompt tables and atomic file replacement shared by the file-backed
//! data sources.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::ItemId;
use crate::ports::DataSourceError;

pub(crate) const ID_COLUMN: &str = "ID";
pub(crate) const PROMPT_COLUMN: &str = "prompt";
pub(crate) const RESPONSE_COLUMN: &str = "response";

/// A whole CSV table held in memory, header first.
///
/// Rows are padded to the header width so every cell can be addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PromptTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl PromptTable {
    /// Reads and parses the table at `path`.
    pub async fn read(path: &Path) -> Result<Self, DataSourceError> {
        let bytes = fs::read(path).await.map_err(|e| {
            DataSourceError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&bytes)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, DataSourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                // pandas and spreadsheet exports may lead with a BOM
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len().max(row.len()), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Serializes the table back to CSV bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DataSourceError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| DataSourceError::TableError(e.to_string()))
    }

    /// Index of a column that must be present.
    pub fn column(&self, name: &'static str) -> Result<usize, DataSourceError> {
        self.find_column(name)
            .ok_or(DataSourceError::MissingColumn(name))
    }

    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of `name`, appending an empty column when it is absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.find_column(name) {
            return index;
        }
        self.headers.push(name.to_string());
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        width - 1
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of the first row whose `column` cell equals `value`.
    pub fn find_row(&self, column: usize, value: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get(column).map(|c| c.trim()) == Some(value))
    }

    /// Fails on the first value in `column` that an earlier row already used.
    ///
    /// Cells are compared trimmed, the same way `find_row` matches them.
    pub fn ensure_unique(&self, column: usize) -> Result<(), DataSourceError> {
        let mut seen = HashSet::new();
        for row in &self.rows {
            let value = row.get(column).map(|c| c.trim()).unwrap_or_default();
            if !seen.insert(value) {
                return Err(DataSourceError::DuplicateId(ItemId::new(value)));
            }
        }
        Ok(())
    }

    pub fn set(&mut self, row: usize, column: usize, value: impl Into<String>) {
        if let Some(cells) = self.rows.get_mut(row) {
            if cells.len() <= column {
                cells.resize(column + 1, String::new());
            }
            cells[column] = value.into();
        }
    }
}

/// Replaces `target` with `contents` by writing a sibling temp file and
/// renaming it over the target.
pub(crate) async fn write_atomic(target: &Path, contents: &[u8]) -> Result<(), DataSourceError> {
    let tmp = temp_sibling(target);

    fs::write(&tmp, contents).await.map_err(|e| {
        DataSourceError::IoError(format!("Failed to write {}: {}", tmp.display(), e))
    })?;

    if let Err(e) = fs::rename(&tmp, target).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(DataSourceError::IoError(format!(
            "Failed to replace {}: {}",
            target.display(),
            e
        )));
    }

    Ok(())
}

fn temp_sibling(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.tmp", name))
}
