use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TenderError {
    #[error("unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("tender record '{0}' not found")]
    NotFound(String),

    #[error("no kept upload for tender {0}")]
    UploadMissing(String),

    #[error("cannot read upload '{filename}': {reason}")]
    Unreadable { filename: String, reason: String },

    #[error("record store is locked by another writer: {0}")]
    StoreWriteConflict(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TenderError {
    /// Errors raised while turning a file into text. The pipeline degrades
    /// these to empty text instead of aborting.
    pub fn is_extraction_stage(&self) -> bool {
        matches!(
            self,
            TenderError::UnsupportedFormat(_)
                | TenderError::ExtractionFailed(_)
                | TenderError::PdftotextNotFound
                | TenderError::PdftotextFailed { .. }
                | TenderError::MalformedDocument(_)
        )
    }
}
