//! Summer Storage Layer
//!
//! SQLite-backed persistence for the table store.
//! Every mutation goes through a transaction on the single shared connection.

mod database;
mod error;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
