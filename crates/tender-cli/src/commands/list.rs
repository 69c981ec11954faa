use tender_core::config::Settings;
use tender_core::error::TenderError;
use tender_core::store::RecordStore;

use crate::output;
use crate::OutputFormat;

pub fn run(settings: &Settings, output_format: OutputFormat) -> Result<(), TenderError> {
    let store = RecordStore::from_settings(settings);
    let summaries = store.list_all()?;

    match output_format {
        OutputFormat::Json => output::json::print(&summaries)?,
        OutputFormat::Table => output::table::print_listing(&summaries),
    }
    Ok(())
}
