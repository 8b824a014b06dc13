//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] summer_storage::StorageError),

    #[error("Table error: {0}")]
    Table(#[from] summer_tables::TableError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bridge closed")]
    BridgeClosed,
}
