use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

/// Placeholder shown for fields the detector could not find.
pub const NOT_FOUND: &str = "not found";

pub const EXCERPT_CHARS: usize = 200;
pub const PREVIEW_ROWS: usize = 10;
pub const PREVIEW_COLS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Xlsx,
    Unknown,
}

impl DocumentFormat {
    /// Infer the format from a file name's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> DocumentFormat {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => DocumentFormat::Pdf,
            Some("docx") => DocumentFormat::Docx,
            Some("xlsx") => DocumentFormat::Xlsx,
            _ => DocumentFormat::Unknown,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Docx => write!(f, "docx"),
            DocumentFormat::Xlsx => write!(f, "xlsx"),
            DocumentFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// Earnest money deposit amount with the currency marker seen next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmdAmount {
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl fmt::Display for EmdAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.currency {
            Some(c) => write!(f, "{c} {}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

/// The structured extraction result for one uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderRecord {
    pub id: Uuid,
    pub filename: String,
    pub format: DocumentFormat,
    pub raw_text: String,
    pub emd_amount: Option<EmdAmount>,
    pub due_date: Option<NaiveDate>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Extraction problems that degraded `raw_text` to empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl TenderRecord {
    pub fn summary_view(&self) -> TenderSummary {
        TenderSummary {
            id: self.id,
            filename: self.filename.clone(),
            format: self.format,
            emd_amount: self.emd_amount.clone(),
            due_date: self.due_date,
            summary: self.summary.clone(),
            created_at: self.created_at,
        }
    }

    /// The opening `EXCERPT_CHARS` characters of the text with whitespace
    /// collapsed, ending in "..." when cut. `None` when no text was extracted.
    pub fn eligibility_excerpt(&self) -> Option<String> {
        let collapsed = self.raw_text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return None;
        }
        match collapsed.char_indices().nth(EXCERPT_CHARS) {
            Some((cut, _)) => Some(format!("{}...", &collapsed[..cut])),
            None => Some(collapsed),
        }
    }

    /// The first `max_rows` rows and `max_cols` columns of a spreadsheet
    /// upload, read back from its tab-separated text.
    pub fn table_preview(&self, max_rows: usize, max_cols: usize) -> Option<Vec<Vec<&str>>> {
        if self.format != DocumentFormat::Xlsx {
            return None;
        }
        let rows: Vec<Vec<&str>> = self
            .raw_text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(max_rows)
            .map(|l| l.split('\t').take(max_cols).collect())
            .collect();
        if rows.is_empty() {
            None
        } else {
            Some(rows)
        }
    }
}

/// Listing projection of a record: everything but the raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderSummary {
    pub id: Uuid,
    pub filename: String,
    pub format: DocumentFormat,
    pub emd_amount: Option<EmdAmount>,
    pub due_date: Option<NaiveDate>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Render an optional field, using the "not found" placeholder for `None`.
pub fn display_or_not_found<T: fmt::Display>(value: Option<&T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NOT_FOUND.to_string(),
    }
}
