pub mod detect;
pub mod download;
pub mod ingest;
pub mod list;
pub mod show;

use std::path::Path;

use tender_core::config::Settings;
use tender_core::extraction::pdftotext::PdftotextExtractor;
use tender_core::model::DocumentFormat;

/// The name an upload is recorded under when `--name` is not given.
fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Warn once, before any work, when PDFs are about to be processed but the
/// configured pdftotext cannot be run. Those PDFs still get records, just
/// with empty text.
fn warn_if_pdftotext_missing<'a>(
    settings: &Settings,
    filenames: impl IntoIterator<Item = &'a str>,
) {
    let has_pdf = filenames
        .into_iter()
        .any(|n| DocumentFormat::from_filename(n) == DocumentFormat::Pdf);
    if !has_pdf || PdftotextExtractor::with_binary(&settings.pdftotext_bin).is_available() {
        return;
    }
    tracing::warn!(binary = %settings.pdftotext_bin, "pdftotext is not available");
    eprintln!(
        "Warning: '{}' could not be run; PDF text will be empty (install poppler-utils or pass --pdftotext)",
        settings.pdftotext_bin
    );
}
