//! Database connection and operations

use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

use crate::error::StorageError;
use crate::Result;

/// Shared handle to the single SQLite connection.
///
/// Cloning is cheap and every clone talks to the same connection, so the
/// mutex is the only writer lock the store needs.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let unavailable = |reason: String| StorageError::Unavailable {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| unavailable(e.to_string()))?;
        }

        let conn = Connection::open(path).map_err(|e| unavailable(e.to_string()))?;

        // WAL keeps readers off the writer's back
        let _: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(|e| unavailable(e.to_string()))?;

        create_schema(&conn).map_err(|e| unavailable(e.to_string()))?;

        tracing::info!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, E>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Runs `f` inside a transaction, committing only when it returns `Ok`.
    pub fn transaction<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, E>,
        E: From<StorageError>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(StorageError::from)?;
        let result = f(&tx)?;
        tx.commit().map_err(StorageError::from)?;
        Ok(result)
    }
}

/// One row per table; `contents` holds the JSON array of records in
/// insertion order. The primary key keeps table names unique.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tables (
            name TEXT PRIMARY KEY NOT NULL,
            contents TEXT NOT NULL DEFAULT '[]'
        );
    "#,
    )?;
    Ok(())
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}
