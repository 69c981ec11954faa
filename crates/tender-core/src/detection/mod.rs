pub mod due_date;
pub mod emd;
pub mod summary;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::EmdAmount;
use due_date::detect_due_date;
use emd::detect_emd;
use summary::summarize;

/// Window sizes and budgets for field detection. All sizes are in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// How far past an EMD label to look for the amount.
    pub emd_window: usize,
    /// How far past a due-date label to look for the date.
    pub date_window: usize,
    pub summary_budget: usize,
    pub summary_sentences: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            emd_window: 80,
            date_window: 60,
            summary_budget: 300,
            summary_sentences: 3,
        }
    }
}

/// Fields detected in a document's text. `None` means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedFields {
    pub emd_amount: Option<EmdAmount>,
    pub due_date: Option<NaiveDate>,
    pub summary: Option<String>,
}

/// Detect fields with the default configuration.
pub fn detect(text: &str) -> DetectedFields {
    detect_with(text, &DetectionConfig::default())
}

pub fn detect_with(text: &str, config: &DetectionConfig) -> DetectedFields {
    DetectedFields {
        emd_amount: detect_emd(text, config.emd_window),
        due_date: detect_due_date(text, config.date_window),
        summary: summarize(text, config.summary_budget, config.summary_sentences),
    }
}

/// The slice of `text` starting at byte `start` and spanning at most
/// `chars` characters.
pub(crate) fn window_after(text: &str, start: usize, chars: usize) -> &str {
    let rest = &text[start..];
    match rest.char_indices().nth(chars) {
        Some((end, _)) => &rest[..end],
        None => rest,
    }
}
