//! Application state container

use chrono::Local;
use std::path::PathBuf;

use summer_storage::Database;
use summer_tables::TableStore;

use crate::bridge::{Event, Request};
use crate::config::Config;
use crate::Result;

/// Owns the configuration and the one store handle for the process.
pub struct App {
    config: Config,
    store: TableStore,
}

impl App {
    /// Open the configured database and seed the well-known tables.
    pub fn open(config: Config) -> Result<Self> {
        let db = Database::open(&config.database_path)?;
        Self::with_database(config, db)
    }

    pub fn with_database(config: Config, db: Database) -> Result<Self> {
        let store = TableStore::new(db);
        store.initialize(config.seed_tables.as_slice())?;

        tracing::info!(
            database = %config.database_path.display(),
            tables = config.seed_tables.len(),
            "App initialized"
        );

        Ok(Self { config, store })
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Answer one request. Failures become [`Event::Failed`].
    pub fn handle(&self, request: Request) -> Event {
        let kind = request.kind();
        tracing::debug!(request = ?kind, "Handling request");

        match self.dispatch(request) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(request = ?kind, error = %e, "Request failed");
                Event::failed(kind, e)
            }
        }
    }

    fn dispatch(&self, request: Request) -> Result<Event> {
        match request {
            Request::Get { name } => Event::recv(&self.store.get(&name)?),
            Request::Add { name, contents } => Event::recv(&self.store.add(&name, &contents)?),
            Request::Delete { name, uuid } => Event::recv(&self.store.delete(&name, &uuid)?),
            Request::Export => {
                let (file_name, path) = self.export()?;
                Ok(Event::Exported { file_name, path })
            }
            Request::Import { contents } => {
                self.store.restore(&contents)?;
                // A backup may predate a seed table
                self.store.initialize(self.config.seed_tables.as_slice())?;
                let tables = self.store.list()?;
                Ok(Event::Imported {
                    tables: tables.into_iter().map(|t| t.name).collect(),
                })
            }
        }
    }

    /// Write a dated backup of every table into the export directory.
    pub fn export(&self) -> Result<(String, PathBuf)> {
        let artifact = self
            .store
            .export(&self.config.app_label, Local::now().date_naive())?;

        std::fs::create_dir_all(&self.config.export_dir)?;
        let path = self.config.export_dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.body)?;

        tracing::info!(path = %path.display(), "Wrote backup");

        Ok((artifact.file_name, path))
    }
}

impl Clone for App {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            store: self.store.clone(),
        }
    }
}
