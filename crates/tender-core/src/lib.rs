pub mod config;
pub mod detection;
pub mod error;
pub mod extraction;
pub mod model;
pub mod pipeline;
pub mod store;

use std::path::Path;

use config::Settings;
use error::TenderError;
use model::TenderRecord;
use pipeline::Pipeline;
use store::RecordStore;

pub use detection::{detect, detect_with, DetectedFields, DetectionConfig};

/// Main API entry point: ingest one uploaded file into `store`.
///
/// `path` is where the upload was staged; `filename` is the name it was
/// uploaded under and decides the format. Extraction problems degrade to
/// empty text on the returned record; only an unreadable file or a store
/// failure is an error.
pub fn ingest_file(
    path: &Path,
    filename: &str,
    store: &RecordStore,
    settings: &Settings,
) -> Result<TenderRecord, TenderError> {
    Pipeline::from_settings(store, settings).ingest(path, filename)
}
