use std::ffi::OsString;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use crate::error::TenderError;
use crate::model::TenderRecord;
use crate::store::{StoreBackend, WriteLock};

/// How a writer waits for `<file>.lock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    /// Give up with `StoreWriteConflict` once this much time has passed.
    pub timeout: Duration,
    /// Delay after the first failed attempt; grows by this much per attempt.
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    /// A lock file older than this was left by a writer that died and is
    /// removed.
    pub stale_after: Duration,
}

impl Default for LockPolicy {
    fn default() -> Self {
        LockPolicy {
            timeout: Duration::from_secs(10),
            base_backoff: Duration::from_millis(5),
            max_backoff: Duration::from_millis(100),
            stale_after: Duration::from_secs(60),
        }
    }
}

/// Stores the collection as one pretty-printed JSON array.
///
/// Writes go to a temp file in the same directory which is then renamed over
/// the collection file, so readers see either the old or the new collection.
/// Writers take `<file>.lock` with `create_new`. A writer that finds the lock
/// held waits with backoff until it is released, and only fails with
/// `StoreWriteConflict` after `LockPolicy::timeout`.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
    lock_policy: LockPolicy,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend {
            path: path.into(),
            lock_policy: LockPolicy::default(),
        }
    }

    pub fn with_lock_policy(mut self, policy: LockPolicy) -> Self {
        self.lock_policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".lock");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> Result<PathBuf, TenderError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Remove `lock_path` if it is older than the stale threshold. Returns
    /// true when the lock is gone and acquisition should be retried at once.
    fn clear_stale_lock(&self, lock_path: &Path) -> Result<bool, TenderError> {
        let modified = match fs::metadata(lock_path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();
        if age < self.lock_policy.stale_after {
            return Ok(false);
        }

        tracing::warn!(
            path = %lock_path.display(),
            age_secs = age.as_secs(),
            "removing stale store lock"
        );
        match fs::remove_file(lock_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}

impl StoreBackend for JsonFileBackend {
    fn load(&self) -> Result<Vec<TenderRecord>, TenderError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn persist(&self, records: &[TenderRecord]) -> Result<(), TenderError> {
        let dir = self.parent_dir()?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, records)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| TenderError::Io(e.error))?;
        Ok(())
    }

    fn lock(&self) -> Result<WriteLock, TenderError> {
        self.parent_dir()?;
        let lock_path = self.lock_path();
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            match fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&lock_path)
            {
                Ok(_) => {
                    if attempt > 0 {
                        tracing::debug!(
                            path = %lock_path.display(),
                            attempts = attempt + 1,
                            waited_ms = started.elapsed().as_millis() as u64,
                            "acquired store lock after waiting"
                        );
                    }
                    return Ok(WriteLock::file(lock_path));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => return Err(e.into()),
            }

            if self.clear_stale_lock(&lock_path)? {
                continue;
            }
            if started.elapsed() >= self.lock_policy.timeout {
                return Err(TenderError::StoreWriteConflict(format!(
                    "{} still held after {:?}",
                    lock_path.display(),
                    self.lock_policy.timeout
                )));
            }

            attempt = attempt.saturating_add(1);
            let backoff = self
                .lock_policy
                .base_backoff
                .saturating_mul(attempt)
                .min(self.lock_policy.max_backoff);
            thread::sleep(backoff);
        }
    }

    fn backend_name(&self) -> &str {
        "json-file"
    }
}
