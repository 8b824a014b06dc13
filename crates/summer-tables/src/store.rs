//! Table store
//!
//! Durable get/add/delete/export over the `tables` collection.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};

use summer_storage::Database;

use crate::error::TableError;
use crate::export::{backup_file_name, ExportArtifact};
use crate::table::{Record, Table};
use crate::Result;

/// Tables the UI expects to exist from first launch
pub const DEFAULT_TABLES: [&str; 2] = ["boms", "items"];

pub struct TableStore {
    db: Database,
}

impl TableStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Ensure each named table exists. Existing tables are left untouched.
    pub fn initialize<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        self.db.transaction(|conn| {
            for name in names {
                let name = name.as_ref();
                let created = conn.execute(
                    "INSERT OR IGNORE INTO tables (name, contents) VALUES (?1, '[]')",
                    [name],
                )?;
                if created > 0 {
                    tracing::info!(table = %name, "Created table");
                }
            }
            Ok::<_, TableError>(())
        })
    }

    pub fn get(&self, name: &str) -> Result<Table> {
        self.db.with_connection(|conn| load_table(conn, name))
    }

    /// All tables, ordered by name
    pub fn list(&self) -> Result<Vec<Table>> {
        self.db.with_connection(load_all_tables)
    }

    /// Append a JSON-encoded record to the end of a table.
    ///
    /// The returned table is read back after the write has committed.
    pub fn add(&self, name: &str, record_json: &str) -> Result<Table> {
        let record: Record =
            serde_json::from_str(record_json).map_err(TableError::MalformedRecord)?;

        self.db.transaction(|conn| {
            let mut table = load_table(conn, name)?;
            table.push_record(record);
            save_table(conn, &table)
        })?;

        let table = self.get(name)?;
        tracing::debug!(table = %name, records = table.len(), "Appended record");
        Ok(table)
    }

    /// Remove the first record whose `uuid` matches.
    ///
    /// An unmatched uuid leaves the stored contents as they were and still
    /// returns the table.
    pub fn delete(&self, name: &str, uuid: &str) -> Result<Table> {
        let removed = self.db.transaction(|conn| {
            let mut table = load_table(conn, name)?;
            if !table.remove_record(uuid) {
                return Ok::<_, TableError>(false);
            }
            save_table(conn, &table)?;
            Ok(true)
        })?;

        if removed {
            tracing::debug!(table = %name, uuid = %uuid, "Deleted record");
        } else {
            tracing::warn!(table = %name, uuid = %uuid, "No record with uuid, nothing deleted");
        }

        self.get(name)
    }

    /// Snapshot all tables into a backup named after `date`.
    pub fn export(&self, label: &str, date: NaiveDate) -> Result<ExportArtifact> {
        let tables = self.list()?;
        let body = serde_json::to_string(&tables)?;

        tracing::info!(tables = tables.len(), bytes = body.len(), "Exported tables");

        Ok(ExportArtifact {
            file_name: backup_file_name(label, date),
            body,
        })
    }

    /// Replace every table with the contents of an export body.
    pub fn restore(&self, body: &str) -> Result<Vec<Table>> {
        let tables: Vec<Table> = serde_json::from_str(body).map_err(TableError::MalformedBackup)?;

        self.db.transaction(|conn| {
            conn.execute("DELETE FROM tables", [])?;
            for table in &tables {
                save_table(conn, table)?;
            }
            Ok::<_, TableError>(())
        })?;

        tracing::info!(tables = tables.len(), "Restored tables from backup");

        self.list()
    }
}

impl Clone for TableStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

fn load_table(conn: &Connection, name: &str) -> Result<Table> {
    let contents: Option<String> = conn
        .query_row(
            "SELECT contents FROM tables WHERE name = ?1",
            [name],
            |row| row.get(0),
        )
        .optional()?;

    let contents = contents.ok_or_else(|| TableError::NotFound(name.to_string()))?;

    Ok(Table {
        name: name.to_string(),
        contents: serde_json::from_str(&contents)?,
    })
}

fn load_all_tables(conn: &Connection) -> Result<Vec<Table>> {
    let mut stmt = conn.prepare("SELECT name, contents FROM tables ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut tables = Vec::new();
    for row in rows {
        let (name, contents) = row?;
        tables.push(Table {
            name,
            contents: serde_json::from_str(&contents)?,
        });
    }

    Ok(tables)
}

fn save_table(conn: &Connection, table: &Table) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO tables (name, contents) VALUES (?1, ?2)",
        rusqlite::params![table.name, table.contents_json()?],
    )?;
    Ok(())
}
