//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use summer_tables::DEFAULT_TABLES;

const DATABASE_FILE: &str = "vmasdanisummer.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Where export backups are written
    pub export_dir: PathBuf,
    /// Prefix of the backup file name
    pub app_label: String,
    /// Tables created on startup if missing
    pub seed_tables: Vec<String>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let export_dir = dirs_next::download_dir().unwrap_or_else(|| data_dir.join("Backups"));

        Self {
            database_path: data_dir.join(DATABASE_FILE),
            export_dir,
            app_label: "Summer".to_string(),
            seed_tables: DEFAULT_TABLES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs_next::data_local_dir()
            .map(|d| d.join("Summer"))
            .unwrap_or_else(|| PathBuf::from(".summer"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
