use std::path::Path;

use tender_core::config::Settings;
use tender_core::error::TenderError;
use tender_core::store::{RecordStore, UploadArchive};

use crate::output;
use crate::OutputFormat;

/// Copy the kept upload of a stored tender to `dest` (a directory or a file
/// path).
pub fn run(
    settings: &Settings,
    id: &str,
    dest: &Path,
    output_format: OutputFormat,
) -> Result<(), TenderError> {
    let store = RecordStore::from_settings(settings);
    let record = store.get_str(id)?;

    let Some(dir) = &settings.uploads_dir else {
        return Err(TenderError::UploadMissing(format!(
            "{} (uploads_dir is null, uploads are not kept)",
            record.id
        )));
    };
    let written = UploadArchive::new(dir).export(&record, dest)?;

    match output_format {
        OutputFormat::Json => output::json::print(&serde_json::json!({
            "id": record.id,
            "filename": record.filename,
            "path": written,
        }))?,
        OutputFormat::Table => println!("Saved {} to {}", record.filename, written.display()),
    }
    Ok(())
}
