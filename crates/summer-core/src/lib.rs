//! Summer Core
//!
//! Owns the table store and answers UI requests over a typed channel.
//! The UI never touches storage directly; it sends a [`Request`] and gets
//! exactly one [`Event`] back.

mod app;
mod bridge;
mod config;
mod error;

pub use app::App;
pub use bridge::{Bridge, Event, Request, RequestKind};
pub use config::Config;
pub use error::CoreError;

pub use summer_storage::{Database, StorageError};
pub use summer_tables::{ExportArtifact, Record, Table, TableError, TableStore, DEFAULT_TABLES};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Logs go to stderr; stdout is reserved for the message channel.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
