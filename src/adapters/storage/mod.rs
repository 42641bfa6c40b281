//! Storage Adapters
//!
//! Implementations of the DataSource port for reading prompts and
//! persisting answers.
//!
//! ## Available Adapters
//!
//! - **DirectoryDataSource** - One response file per item and model
//! - **TableDataSource** - A `response` column in a CSV working copy
//! - **InMemoryDataSource** - Items and answers in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{DirectoryDataSource, TableDataSource};
//!
//! // Per-item files
//! let source = DirectoryDataSource::new("./data/prompts.csv", "./responses", "gpt-4o");
//!
//! // Response column
//! let source = TableDataSource::new("./data/prompts.csv", "./responses/ibe.csv");
//! ```

mod directory_data_source;
mod in_memory_data_source;
mod prompt_table;
mod table_data_source;

pub use directory_data_source::DirectoryDataSource;
pub use in_memory_data_source::InMemoryDataSource;
pub use table_data_source::TableDataSource;
