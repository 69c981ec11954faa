use tender_core::model::{
    display_or_not_found, TenderRecord, TenderSummary, PREVIEW_COLS, PREVIEW_ROWS,
};

const SUMMARY_COLUMN: usize = 48;
const CELL_WIDTH: usize = 20;

/// Dashboard listing, one line per tender.
pub fn print_listing(summaries: &[TenderSummary]) {
    if summaries.is_empty() {
        println!("No tenders stored yet.");
        return;
    }

    let name_width = summaries
        .iter()
        .map(|s| s.filename.chars().count())
        .max()
        .unwrap_or(0)
        .max("Filename".len());

    println!(
        "{:>3}  {:<36}  {:<name_width$}  {:<14}  {:<10}  Summary",
        "#", "ID", "Filename", "EMD", "Due Date"
    );
    for (i, s) in summaries.iter().enumerate() {
        let summary = s
            .summary
            .as_deref()
            .map(|text| truncate(text, SUMMARY_COLUMN))
            .unwrap_or_else(|| "No summary".to_string());
        println!(
            "{:>3}  {:<36}  {:<name_width$}  {:<14}  {:<10}  {}",
            i + 1,
            s.id,
            s.filename,
            display_or_not_found(s.emd_amount.as_ref()),
            display_or_not_found(s.due_date.as_ref()),
            summary
        );
    }
}

/// Detail view of a single tender.
pub fn print_record(record: &TenderRecord, full_text: bool) {
    println!("=== {} ===\n", record.filename);
    println!("  ID:        {}", record.id);
    println!("  Format:    {}", record.format);
    println!(
        "  Uploaded:  {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  EMD:       {}",
        display_or_not_found(record.emd_amount.as_ref())
    );
    println!(
        "  Due date:  {}",
        display_or_not_found(record.due_date.as_ref())
    );
    println!(
        "  Summary:   {}",
        display_or_not_found(record.summary.as_ref())
    );
    println!(
        "  Eligibility (excerpt): {}",
        display_or_not_found(record.eligibility_excerpt().as_ref())
    );

    if let Some(rows) = record.table_preview(PREVIEW_ROWS, PREVIEW_COLS) {
        println!("\n  Table data (first {PREVIEW_ROWS} rows):");
        for line in grid_lines(&rows) {
            println!("    {line}");
        }
    }

    if !record.warnings.is_empty() {
        println!("\n  Warnings:");
        for w in &record.warnings {
            println!("    {w}");
        }
    }

    if full_text {
        println!("\n--- Full text ---");
        if record.raw_text.is_empty() {
            println!("(no text extracted)");
        } else {
            println!("{}", record.raw_text.trim_end());
        }
    }
}

/// Left-align the cells of `rows` into columns, each cell cut to
/// `CELL_WIDTH` characters.
fn grid_lines(rows: &[Vec<&str>]) -> Vec<String> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| truncate(c, CELL_WIDTH)).collect())
        .collect();
    let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    cells
        .iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
