//! Summer Tables
//!
//! - A table is a named, ordered list of JSON records
//! - Table names are unique; `boms` and `items` are seeded on startup
//! - Records are opaque except for the `uuid` field used by delete
//! - Every mutation is committed before the updated table is read back

mod error;
mod export;
mod store;
mod table;

pub use error::TableError;
pub use export::{backup_file_name, ExportArtifact};
pub use store::{TableStore, DEFAULT_TABLES};
pub use table::{Record, Table};

pub type Result<T> = std::result::Result<T, TableError>;
