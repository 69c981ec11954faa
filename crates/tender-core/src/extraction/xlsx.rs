use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::error::TenderError;
use crate::extraction::TextExtractor;

/// Flattens every sheet of an xlsx workbook into text: one line per
/// non-empty row, cells separated by tabs.
pub struct XlsxExtractor;

impl TextExtractor for XlsxExtractor {
    fn extract(&self, path: &Path) -> Result<String, TenderError> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| TenderError::MalformedDocument(format!("failed to open xlsx: {e}")))?;

        let mut out = String::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                TenderError::MalformedDocument(format!("failed to read sheet '{name}': {e}"))
            })?;
            for row in range.rows() {
                if let Some(line) = row_to_line(row) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
        }

        Ok(out)
    }

    fn backend_name(&self) -> &str {
        "xlsx"
    }
}

/// Join a row's cells with tabs, keeping interior blanks so columns line up.
/// Returns None for rows with no content.
fn row_to_line(row: &[Data]) -> Option<String> {
    let mut cells: Vec<String> = row.iter().map(cell_text).collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    if cells.is_empty() {
        None
    } else {
        Some(cells.join("\t"))
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::Empty => String::new(),
        _ => format!("{cell}"),
    }
}
