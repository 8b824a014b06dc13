//! Backup export artifact

use chrono::NaiveDate;
use serde::Serialize;

/// A downloadable snapshot of every table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    /// Unindented JSON array of `{name, contents}` tables
    pub body: String,
}

/// `"<label> backup <Weekday> <Day> <Month> <Year>"`, e.g. `Summer backup Sun 5 Oct 2025`
pub fn backup_file_name(label: &str, date: NaiveDate) -> String {
    format!("{label} backup {}", date.format("%a %-d %b %Y"))
}
