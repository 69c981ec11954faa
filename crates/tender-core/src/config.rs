use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detection::DetectionConfig;
use crate::error::TenderError;
use crate::extraction::pdftotext::DEFAULT_BINARY;

pub const DEFAULT_STORE_FILE: &str = "tenders.json";
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";

/// Runtime settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON file holding the record collection.
    pub store_path: PathBuf,
    /// Seconds a writer waits for another writer's lock before giving up.
    pub store_lock_timeout_secs: u64,
    /// Where ingested uploads are kept for later download. `null` keeps
    /// nothing.
    pub uploads_dir: Option<PathBuf>,
    pub pdftotext_bin: String,
    pub detection: DetectionConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            store_lock_timeout_secs: 10,
            uploads_dir: Some(PathBuf::from(DEFAULT_UPLOADS_DIR)),
            pdftotext_bin: DEFAULT_BINARY.to_string(),
            detection: DetectionConfig::default(),
        }
    }
}

/// Load settings from a JSON file.
pub fn load_settings(path: &Path) -> Result<Settings, TenderError> {
    let content = std::fs::read_to_string(path).map_err(|e| TenderError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_settings(&content, path)
}

/// Parse settings from a JSON string.
pub fn parse_settings(json: &str, source: &Path) -> Result<Settings, TenderError> {
    let settings: Settings = serde_json::from_str(json).map_err(|e| TenderError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_settings(&settings, source)?;
    Ok(settings)
}

fn validate_settings(settings: &Settings, source: &Path) -> Result<(), TenderError> {
    let invalid = |reason: &str| TenderError::ConfigLoad {
        path: source.to_path_buf(),
        reason: reason.to_string(),
    };

    if settings.store_path.as_os_str().is_empty() {
        return Err(invalid("store_path must not be empty"));
    }
    if settings.store_lock_timeout_secs == 0 {
        return Err(invalid("store_lock_timeout_secs must be at least one second"));
    }
    if settings
        .uploads_dir
        .as_ref()
        .is_some_and(|d| d.as_os_str().is_empty())
    {
        return Err(invalid("uploads_dir must not be empty; use null to keep no uploads"));
    }
    if settings.pdftotext_bin.trim().is_empty() {
        return Err(invalid("pdftotext_bin must not be empty"));
    }
    if settings.detection.emd_window == 0 || settings.detection.date_window == 0 {
        return Err(invalid("detection windows must be at least one character"));
    }
    if settings.detection.summary_budget == 0 {
        return Err(invalid("summary_budget must be at least one character"));
    }
    Ok(())
}
