//! Storage error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable at {}: {reason}", path.display())]
    Unavailable { path: PathBuf, reason: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
