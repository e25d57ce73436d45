//! Record sync for validated documents
//!
//! After a scan, the set of valid documents is the authoritative set of
//! records: stored records with no valid document behind them are removed,
//! then every valid document's frontmatter is upserted under its file stem.

use crate::frontmatter;
use mdlint_core::ValidationResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Field values of one record
pub type RecordFields = BTreeMap<String, serde_json::Value>;

/// Durable storage for records keyed by name
pub trait RecordStore {
    /// Names of every stored record
    fn names(&self) -> Vec<String>;

    /// Fetch a record
    fn get(&self, name: &str) -> Option<&RecordFields>;

    /// Remove a record if present
    fn remove(&mut self, name: &str) -> Result<(), SyncError>;

    /// Insert or replace a record
    fn upsert(&mut self, name: &str, fields: RecordFields) -> Result<(), SyncError>;
}

/// In-memory record store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    records: BTreeMap<String, RecordFields>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn names(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> Option<&RecordFields> {
        self.records.get(name)
    }

    fn remove(&mut self, name: &str) -> Result<(), SyncError> {
        self.records.remove(name);
        Ok(())
    }

    fn upsert(&mut self, name: &str, fields: RecordFields) -> Result<(), SyncError> {
        self.records.insert(name.to_string(), fields);
        Ok(())
    }
}

/// Record store persisted as a JSON file
///
/// Changes are held in memory until [`JsonFileStore::save`] is called.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

#[derive(Serialize, Deserialize)]
struct StoreFile {
    records: BTreeMap<String, RecordFields>,
}

impl JsonFileStore {
    /// Open a store, starting empty if the file does not exist yet
    pub fn open(path: &Path) -> Result<Self, SyncError> {
        let records = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| SyncError::Io(path.display().to_string(), e.to_string()))?;
            serde_json::from_str::<StoreFile>(&contents)
                .map_err(|e| SyncError::Store(format!("{}: {}", path.display(), e)))?
                .records
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            inner: MemoryStore { records },
        })
    }

    /// Write the store back to its file
    pub fn save(&self) -> Result<(), SyncError> {
        let file = StoreFile {
            records: self.inner.records.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| SyncError::Store(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| SyncError::Io(self.path.display().to_string(), e.to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonFileStore {
    fn names(&self) -> Vec<String> {
        self.inner.names()
    }

    fn get(&self, name: &str) -> Option<&RecordFields> {
        self.inner.get(name)
    }

    fn remove(&mut self, name: &str) -> Result<(), SyncError> {
        self.inner.remove(name)
    }

    fn upsert(&mut self, name: &str, fields: RecordFields) -> Result<(), SyncError> {
        self.inner.upsert(name, fields)
    }
}

/// What a sync changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Stale records removed
    pub removed: usize,

    /// Records inserted or replaced
    pub upserted: usize,

    /// Valid files whose frontmatter could not be re-read
    pub failed: Vec<PathBuf>,
}

/// Mirror the valid documents of a scan into a record store
pub fn sync_records(
    results: &[ValidationResult],
    store: &mut dyn RecordStore,
) -> Result<SyncSummary, SyncError> {
    let mut summary = SyncSummary::default();

    let current: BTreeSet<&str> = results
        .iter()
        .filter(|r| r.is_valid())
        .filter_map(ValidationResult::record_name)
        .collect();

    for name in store.names() {
        if !current.contains(name.as_str()) {
            store.remove(&name)?;
            summary.removed += 1;
        }
    }

    for result in results.iter().filter(|r| r.is_valid()) {
        let Some(name) = result.record_name() else {
            continue;
        };

        match read_fields(&result.file_path) {
            Ok(fields) => {
                store.upsert(name, fields)?;
                summary.upserted += 1;
            }
            Err(err) => {
                tracing::warn!("Error processing {}: {}", result.file_path.display(), err);
                summary.failed.push(result.file_path.clone());
            }
        }
    }

    tracing::info!(
        "Synced {} records, removed {} stale records",
        summary.upserted,
        summary.removed
    );

    Ok(summary)
}

/// Re-read a document's frontmatter as record fields
fn read_fields(path: &Path) -> Result<RecordFields, SyncError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SyncError::Io(path.display().to_string(), e.to_string()))?;

    let data = frontmatter::extract_and_parse(&text)
        .map_err(|e| SyncError::Document(e.to_string()))?
        .ok_or_else(|| SyncError::Document("No frontmatter found".to_string()))?;

    data.iter()
        .map(|(key, value)| {
            let json = serde_json::to_value(value).map_err(|e| SyncError::Document(e.to_string()))?;
            Ok((frontmatter::key_name(key), json))
        })
        .collect()
}

/// Record sync errors
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("IO error on {0}: {1}")]
    Io(String, String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Document error: {0}")]
    Document(String),
}
