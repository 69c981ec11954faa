use std::sync::Mutex;

use crate::error::TenderError;
use crate::model::TenderRecord;
use crate::store::{StoreBackend, WriteLock};

/// Keeps the collection in memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Mutex<Vec<TenderRecord>>,
}

impl StoreBackend for MemoryBackend {
    fn load(&self) -> Result<Vec<TenderRecord>, TenderError> {
        let records = self.records.lock().unwrap_or_else(|p| p.into_inner());
        Ok(records.clone())
    }

    fn persist(&self, records: &[TenderRecord]) -> Result<(), TenderError> {
        let mut stored = self.records.lock().unwrap_or_else(|p| p.into_inner());
        *stored = records.to_vec();
        Ok(())
    }

    fn lock(&self) -> Result<WriteLock, TenderError> {
        Ok(WriteLock::in_process())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
