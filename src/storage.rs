// src/storage.rs

use std::fs;
use std::path::PathBuf;

use log::debug;
use thiserror::Error;

use crate::models::{ProgressRecord, StudyStats};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistence collaborator for a learner's progress. The two shipped
/// implementations — a local JSON file and SQLite — are interchangeable
/// behind this interface.
pub trait ProgressStore {
    /// Full record set for the learner. An empty backend loads as empty,
    /// never as an error.
    fn load(&mut self) -> Result<Vec<ProgressRecord>>;

    /// Inserts or updates the single record for `record.card_id`.
    fn upsert_attempt(&mut self, record: &ProgressRecord) -> Result<()>;

    /// Persists recomputed statistics wholesale. Backends that derive
    /// statistics from the records on load keep the default no-op.
    fn save_stats(&mut self, _stats: &StudyStats) -> Result<()> {
        Ok(())
    }

    /// Removes every record for the learner.
    fn clear(&mut self) -> Result<()>;
}

/// Local store: the whole record array lives in one JSON file, timestamps
/// as RFC 3339 strings. The counterpart of a browser's single storage key.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        JsonFileStore { path }
    }

    fn read_all(&self) -> Result<Vec<ProgressRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let records: Vec<ProgressRecord> = serde_json::from_str(&content)?;
        Ok(records)
    }

    fn write_all(&self, records: &[ProgressRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(records)?)?;
        Ok(())
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&mut self) -> Result<Vec<ProgressRecord>> {
        self.read_all()
    }

    fn upsert_attempt(&mut self, record: &ProgressRecord) -> Result<()> {
        let mut records = self.read_all()?;
        match records.iter_mut().find(|r| r.card_id == record.card_id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_all(&records)
    }

    fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            debug!("progress file removed");
        }
        Ok(())
    }
}
