use std::fmt;
use std::fs::{self, File};
use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use crate::config::Settings;
use crate::detection::{detect_with, DetectionConfig};
use crate::error::TenderError;
use crate::extraction::ExtractorSet;
use crate::model::{DocumentFormat, TenderRecord};
use crate::store::{RecordStore, UploadArchive};

/// Where one upload is in the pipeline. `Persisted` and `Failed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestState {
    Received,
    Extracting,
    Detecting,
    Persisted,
    Failed,
}

impl fmt::Display for IngestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IngestState::Received => "received",
            IngestState::Extracting => "extracting",
            IngestState::Detecting => "detecting",
            IngestState::Persisted => "persisted",
            IngestState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Turns an uploaded file into a stored `TenderRecord`.
pub struct Pipeline<'a> {
    store: &'a RecordStore,
    extractors: ExtractorSet,
    detection: DetectionConfig,
    uploads: Option<UploadArchive>,
}

impl<'a> Pipeline<'a> {
    pub fn new(store: &'a RecordStore, extractors: ExtractorSet, detection: DetectionConfig) -> Self {
        Pipeline {
            store,
            extractors,
            detection,
            uploads: None,
        }
    }

    pub fn from_settings(store: &'a RecordStore, settings: &Settings) -> Self {
        let pipeline = Self::new(
            store,
            ExtractorSet::with_pdftotext(&settings.pdftotext_bin),
            settings.detection.clone(),
        );
        match &settings.uploads_dir {
            Some(dir) => pipeline.with_uploads(UploadArchive::new(dir)),
            None => pipeline,
        }
    }

    /// Keep a copy of every ingested upload in `archive`.
    pub fn with_uploads(mut self, archive: UploadArchive) -> Self {
        self.uploads = Some(archive);
        self
    }

    /// Ingest the staged file at `path`, uploaded as `filename`.
    ///
    /// Extraction problems never abort ingestion: the record is stored with
    /// empty text, "not found" fields and a warning. Only a file that cannot
    /// be read at all fails with `Unreadable`. With an upload archive the
    /// file is kept there before the record is stored.
    pub fn ingest(&self, path: &Path, filename: &str) -> Result<TenderRecord, TenderError> {
        let record = self.build_record(path, filename)?;
        if let Some(archive) = &self.uploads {
            archive.retain(path, &record.id, filename)?;
        }
        self.store.save(&record)?;
        enter(IngestState::Persisted, filename);
        tracing::info!(id = %record.id, filename, format = %record.format, "ingested tender");
        Ok(record)
    }

    /// Run extraction and detection without storing anything.
    pub fn preview(&self, path: &Path, filename: &str) -> Result<TenderRecord, TenderError> {
        self.build_record(path, filename)
    }

    fn build_record(&self, path: &Path, filename: &str) -> Result<TenderRecord, TenderError> {
        enter(IngestState::Received, filename);
        if let Err(e) = check_readable(path, filename) {
            enter(IngestState::Failed, filename);
            tracing::warn!(filename, error = %e, "upload rejected");
            return Err(e);
        }

        let format = DocumentFormat::from_filename(filename);
        enter(IngestState::Extracting, filename);
        let extraction = self.extractors.extract(path, format);

        enter(IngestState::Detecting, filename);
        let fields = detect_with(&extraction.text, &self.detection);

        Ok(TenderRecord {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            format,
            raw_text: extraction.text,
            emd_amount: fields.emd_amount,
            due_date: fields.due_date,
            summary: fields.summary,
            created_at: Utc::now(),
            warnings: extraction.warnings,
        })
    }
}

fn enter(state: IngestState, filename: &str) {
    tracing::debug!(%state, filename, "ingest state");
}

/// The upload must be a non-empty regular file we can open.
fn check_readable(path: &Path, filename: &str) -> Result<(), TenderError> {
    let unreadable = |reason: String| TenderError::Unreadable {
        filename: filename.to_string(),
        reason,
    };

    let meta = fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
    if !meta.is_file() {
        return Err(unreadable("not a regular file".into()));
    }
    if meta.len() == 0 {
        return Err(unreadable("file is empty".into()));
    }
    File::open(path).map_err(|e| unreadable(e.to_string()))?;
    Ok(())
}
