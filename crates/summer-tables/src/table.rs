//! Table data structure

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque application record. Only the `uuid` field is ever inspected.
pub type Record = Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Unique table name
    pub name: String,
    /// Records in insertion order
    pub contents: Vec<Record>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: Vec::new(),
        }
    }

    /// Unindented JSON array of the records
    pub fn contents_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.contents)
    }

    pub fn push_record(&mut self, record: Record) {
        self.contents.push(record);
    }

    /// Index of the first record whose `uuid` field equals `uuid`
    pub fn position_of(&self, uuid: &str) -> Option<usize> {
        self.contents
            .iter()
            .position(|record| record.get("uuid").and_then(Value::as_str) == Some(uuid))
    }

    /// Removes the first record matching `uuid`. Returns whether one was removed.
    pub fn remove_record(&mut self, uuid: &str) -> bool {
        match self.position_of(uuid) {
            Some(index) => {
                self.contents.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
