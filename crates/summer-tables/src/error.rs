//! Table error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Table not found: {0}")]
    NotFound(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(#[source] serde_json::Error),

    #[error("Malformed backup: {0}")]
    MalformedBackup(#[source] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] summer_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for TableError {
    fn from(e: rusqlite::Error) -> Self {
        TableError::Storage(e.into())
    }
}
