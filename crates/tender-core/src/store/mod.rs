pub mod json_file;
pub mod memory;
pub mod uploads;

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use uuid::Uuid;

use crate::config::Settings;
use crate::error::TenderError;
use crate::model::{TenderRecord, TenderSummary};
pub use json_file::{JsonFileBackend, LockPolicy};
pub use memory::MemoryBackend;
pub use uploads::UploadArchive;

/// Persistence for the whole record collection. Every write replaces the
/// complete collection.
pub trait StoreBackend: Send + Sync {
    /// Read the full collection in insertion order.
    fn load(&self) -> Result<Vec<TenderRecord>, TenderError>;

    /// Replace the persisted collection with `records`.
    fn persist(&self, records: &[TenderRecord]) -> Result<(), TenderError>;

    /// Take the exclusive writer lock for one read-modify-write cycle,
    /// waiting while another writer holds it.
    fn lock(&self) -> Result<WriteLock, TenderError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Held for the duration of a write. A file-backed lock removes its lock
/// file on drop.
#[derive(Debug)]
pub struct WriteLock {
    lock_path: Option<PathBuf>,
}

impl WriteLock {
    pub fn in_process() -> Self {
        WriteLock { lock_path: None }
    }

    pub fn file(lock_path: PathBuf) -> Self {
        WriteLock {
            lock_path: Some(lock_path),
        }
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Some(path) = self.lock_path.take() {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove store lock file");
            }
        }
    }
}

/// Durable mapping from tender id to record.
pub struct RecordStore {
    backend: Box<dyn StoreBackend>,
    writer: Mutex<()>,
}

impl RecordStore {
    pub fn new(backend: Box<dyn StoreBackend>) -> Self {
        RecordStore {
            backend,
            writer: Mutex::new(()),
        }
    }

    /// A store persisted to a single JSON file.
    pub fn open_json(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(JsonFileBackend::new(path)))
    }

    /// The JSON store named by `settings`, waiting at most
    /// `store_lock_timeout_secs` for another writer.
    pub fn from_settings(settings: &Settings) -> Self {
        let policy = LockPolicy {
            timeout: Duration::from_secs(settings.store_lock_timeout_secs),
            ..LockPolicy::default()
        };
        Self::new(Box::new(
            JsonFileBackend::new(&settings.store_path).with_lock_policy(policy),
        ))
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::default()))
    }

    /// Insert `record`, or replace the record with the same id, and rewrite
    /// the collection. Concurrent writers take turns; none of their records
    /// is lost.
    pub fn save(&self, record: &TenderRecord) -> Result<(), TenderError> {
        // The guarded value is (), so a poisoned lock carries no broken state.
        let _writer = self.writer.lock().unwrap_or_else(|p| p.into_inner());
        let _lock = self.backend.lock()?;

        let mut records = self.backend.load()?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.backend.persist(&records)?;

        tracing::info!(
            id = %record.id,
            filename = %record.filename,
            backend = self.backend.backend_name(),
            total = records.len(),
            "saved tender record"
        );
        Ok(())
    }

    /// Summaries of every record, most recent first.
    pub fn list_all(&self) -> Result<Vec<TenderSummary>, TenderError> {
        let records = self.backend.load()?;
        Ok(records.iter().rev().map(TenderRecord::summary_view).collect())
    }

    pub fn get(&self, id: &Uuid) -> Result<TenderRecord, TenderError> {
        self.backend
            .load()?
            .into_iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| TenderError::NotFound(id.to_string()))
    }

    /// Look up a record by the textual form of its id.
    pub fn get_str(&self, id: &str) -> Result<TenderRecord, TenderError> {
        let id = Uuid::parse_str(id.trim()).map_err(|_| TenderError::NotFound(id.to_string()))?;
        self.get(&id)
    }

    pub fn len(&self) -> Result<usize, TenderError> {
        Ok(self.backend.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, TenderError> {
        Ok(self.len()? == 0)
    }
}
