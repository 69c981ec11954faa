use std::path::PathBuf;

use tender_core::config::Settings;
use tender_core::error::TenderError;
use tender_core::pipeline::Pipeline;
use tender_core::store::RecordStore;

use super::{upload_name, warn_if_pdftotext_missing};
use crate::output;
use crate::OutputFormat;

pub fn run(
    settings: &Settings,
    file: PathBuf,
    output_format: OutputFormat,
) -> Result<(), TenderError> {
    // Nothing is saved, so an in-memory store stands in for the real one.
    let store = RecordStore::in_memory();
    let pipeline = Pipeline::from_settings(&store, settings);
    let filename = upload_name(&file);
    warn_if_pdftotext_missing(settings, [filename.as_str()]);
    let record = pipeline.preview(&file, &filename)?;

    match output_format {
        OutputFormat::Json => output::json::print(&record)?,
        OutputFormat::Table => output::table::print_record(&record, false),
    }
    Ok(())
}
