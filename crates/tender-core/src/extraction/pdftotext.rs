use crate::error::TenderError;
use crate::extraction::TextExtractor;
use std::path::Path;
use std::process::Command;

pub const DEFAULT_BINARY: &str = "pdftotext";

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` so table columns stay on one line, which keeps
/// "label ... value" pairs within the detector's window.
pub struct PdftotextExtractor {
    binary: String,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_BINARY)
    }

    pub fn with_binary(binary: &str) -> Self {
        PdftotextExtractor {
            binary: binary.to_string(),
        }
    }

    /// Check if the configured pdftotext binary can be run.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdftotextExtractor {
    fn extract(&self, path: &Path) -> Result<String, TenderError> {
        let output = Command::new(&self.binary)
            .arg("-layout")
            .arg(path)
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TenderError::PdftotextNotFound
                } else {
                    TenderError::ExtractionFailed(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(TenderError::PdftotextFailed { code, stderr });
        }

        let text = join_pages(&String::from_utf8_lossy(&output.stdout));
        if text.trim().is_empty() {
            return Err(TenderError::ExtractionFailed(
                "pdftotext produced no text (scanned PDF?)".into(),
            ));
        }

        Ok(text)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// pdftotext separates pages with form feeds; turn them into line breaks
/// and drop the empty trailing page it emits.
fn join_pages(raw: &str) -> String {
    let pages: Vec<&str> = raw
        .split('\x0c')
        .map(|p| p.trim_end_matches('\n'))
        .filter(|p| !p.trim().is_empty())
        .collect();
    pages.join("\n")
}
