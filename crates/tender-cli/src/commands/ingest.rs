use std::path::PathBuf;

use tender_core::config::Settings;
use tender_core::error::TenderError;
use tender_core::pipeline::Pipeline;
use tender_core::store::RecordStore;

use super::{upload_name, warn_if_pdftotext_missing};
use crate::output;
use crate::OutputFormat;

/// Ingest every file, reporting failures as they happen. Returns whether all
/// files were ingested.
pub fn run(
    settings: &Settings,
    files: Vec<PathBuf>,
    name: Option<String>,
    output_format: OutputFormat,
) -> Result<bool, TenderError> {
    if name.is_some() && files.len() > 1 {
        eprintln!("Error: --name can only be used with a single file");
        return Ok(false);
    }

    let filenames: Vec<String> = match &name {
        Some(n) => vec![n.clone()],
        None => files.iter().map(|p| upload_name(p)).collect(),
    };
    warn_if_pdftotext_missing(settings, filenames.iter().map(String::as_str));

    let store = RecordStore::from_settings(settings);
    let pipeline = Pipeline::from_settings(&store, settings);

    let mut records = Vec::new();
    let mut failed = 0;
    for (path, filename) in files.iter().zip(&filenames) {
        match pipeline.ingest(path, filename) {
            Ok(record) => records.push(record),
            Err(e) => {
                eprintln!("Error: {e}");
                failed += 1;
            }
        }
    }

    match output_format {
        OutputFormat::Json => output::json::print(&records)?,
        OutputFormat::Table => {
            for record in &records {
                output::table::print_record(record, false);
                println!();
            }
            eprintln!(
                "Ingested {} file(s) into {}",
                records.len(),
                settings.store_path.display()
            );
        }
    }

    Ok(failed == 0)
}
