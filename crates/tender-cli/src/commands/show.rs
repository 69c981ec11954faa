use tender_core::config::Settings;
use tender_core::error::TenderError;
use tender_core::store::RecordStore;

use crate::output;
use crate::OutputFormat;

pub fn run(
    settings: &Settings,
    id: &str,
    full_text: bool,
    output_format: OutputFormat,
) -> Result<(), TenderError> {
    let store = RecordStore::from_settings(settings);
    let record = store.get_str(id)?;

    match output_format {
        OutputFormat::Json => output::json::print(&record)?,
        OutputFormat::Table => output::table::print_record(&record, full_text),
    }
    Ok(())
}
