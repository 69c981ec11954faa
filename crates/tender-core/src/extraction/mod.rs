pub mod docx;
pub mod pdftotext;
pub mod xlsx;

use std::path::Path;

use crate::error::TenderError;
use crate::model::DocumentFormat;
use docx::DocxExtractor;
use pdftotext::PdftotextExtractor;
use xlsx::XlsxExtractor;

/// Trait for format-specific text extraction backends.
pub trait TextExtractor: Send + Sync {
    /// Turn the file at `path` into plain text.
    fn extract(&self, path: &Path) -> Result<String, TenderError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Backend for extensions with no extractor. Always reports the format as
/// unsupported; `ExtractorSet` turns that into empty text.
pub struct UnsupportedExtractor;

impl TextExtractor for UnsupportedExtractor {
    fn extract(&self, path: &Path) -> Result<String, TenderError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Err(TenderError::UnsupportedFormat(ext))
    }

    fn backend_name(&self) -> &str {
        "unsupported"
    }
}

/// Text pulled out of a document, plus any problems that degraded it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub warnings: Vec<String>,
}

/// One extractor per `DocumentFormat` variant.
pub struct ExtractorSet {
    pdf: Box<dyn TextExtractor>,
    docx: Box<dyn TextExtractor>,
    xlsx: Box<dyn TextExtractor>,
    unknown: Box<dyn TextExtractor>,
}

impl ExtractorSet {
    pub fn new(
        pdf: Box<dyn TextExtractor>,
        docx: Box<dyn TextExtractor>,
        xlsx: Box<dyn TextExtractor>,
        unknown: Box<dyn TextExtractor>,
    ) -> Self {
        ExtractorSet {
            pdf,
            docx,
            xlsx,
            unknown,
        }
    }

    /// The standard backends, running `pdftotext_bin` for PDFs.
    pub fn with_pdftotext(pdftotext_bin: &str) -> Self {
        ExtractorSet::new(
            Box::new(PdftotextExtractor::with_binary(pdftotext_bin)),
            Box::new(DocxExtractor),
            Box::new(XlsxExtractor),
            Box::new(UnsupportedExtractor),
        )
    }

    pub fn for_format(&self, format: DocumentFormat) -> &dyn TextExtractor {
        match format {
            DocumentFormat::Pdf => self.pdf.as_ref(),
            DocumentFormat::Docx => self.docx.as_ref(),
            DocumentFormat::Xlsx => self.xlsx.as_ref(),
            DocumentFormat::Unknown => self.unknown.as_ref(),
        }
    }

    /// Extract text for `format`. Never fails: every backend error becomes
    /// empty text plus a warning.
    pub fn extract(&self, path: &Path, format: DocumentFormat) -> Extraction {
        let extractor = self.for_format(format);
        match extractor.extract(path) {
            Ok(text) => Extraction {
                text,
                warnings: Vec::new(),
            },
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    backend = extractor.backend_name(),
                    error = %e,
                    "extraction degraded to empty text"
                );
                Extraction {
                    text: String::new(),
                    warnings: vec![format!("{}: {}", extractor.backend_name(), e)],
                }
            }
        }
    }
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self::with_pdftotext(pdftotext::DEFAULT_BINARY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unknown_format_yields_empty_text_with_warning() {
        let set = ExtractorSet::default();
        let out = set.extract(Path::new("notes.txt"), DocumentFormat::Unknown);
        assert!(out.text.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("unsupported"));
    }

    #[test]
    fn missing_pdftotext_binary_degrades() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4 not really").unwrap();

        let set = ExtractorSet::with_pdftotext("pdftotext-does-not-exist-here");
        let out = set.extract(file.path(), DocumentFormat::Pdf);
        assert!(out.text.is_empty());
        assert!(out.warnings[0].starts_with("pdftotext:"));
    }

    #[test]
    fn corrupt_containers_degrade() {
        let set = ExtractorSet::default();
        for (suffix, format) in [(".docx", DocumentFormat::Docx), (".xlsx", DocumentFormat::Xlsx)] {
            let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
            file.write_all(b"this is not a zip container").unwrap();
            let out = set.extract(file.path(), format);
            assert!(out.text.is_empty(), "{suffix} should degrade");
            assert_eq!(out.warnings.len(), 1);
        }
    }

    #[test]
    fn missing_file_degrades_for_every_format() {
        let set = ExtractorSet::with_pdftotext("pdftotext-does-not-exist-here");
        let path = Path::new("/nonexistent/dir/file");
        for format in [
            DocumentFormat::Pdf,
            DocumentFormat::Docx,
            DocumentFormat::Xlsx,
            DocumentFormat::Unknown,
        ] {
            let out = set.extract(path, format);
            assert!(out.text.is_empty());
            assert!(!out.warnings.is_empty());
        }
    }
}
