//! Integration tests for the ingest pipeline end to end.
//!
//! PDF text comes from a MockExtractor so these tests run without
//! poppler-utils; DOCX containers are generated on the fly.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tender_core::config::Settings;
use tender_core::error::TenderError;
use tender_core::extraction::docx::DocxExtractor;
use tender_core::extraction::xlsx::XlsxExtractor;
use tender_core::extraction::{ExtractorSet, TextExtractor, UnsupportedExtractor};
use tender_core::model::{DocumentFormat, NOT_FOUND, PREVIEW_COLS, PREVIEW_ROWS};
use tender_core::pipeline::Pipeline;
use tender_core::store::{RecordStore, UploadArchive};
use tender_core::{detect, ingest_file, DetectionConfig};

struct MockExtractor {
    text: Result<String, String>,
}

impl TextExtractor for MockExtractor {
    fn extract(&self, _path: &Path) -> Result<String, TenderError> {
        self.text.clone().map_err(TenderError::ExtractionFailed)
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn extractors_with_pdf_text(text: Result<&str, &str>) -> ExtractorSet {
    ExtractorSet::new(
        Box::new(MockExtractor {
            text: text.map(str::to_string).map_err(str::to_string),
        }),
        Box::new(DocxExtractor),
        Box::new(XlsxExtractor),
        Box::new(UnsupportedExtractor),
    )
}

fn staged_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

const NOTICE: &str = "Municipal Corporation\n\
    Notice Inviting Tender for supply of street lights\n\
    EMD Amount: Rs. 50,000/-\n\
    Last Date: 25/12/2024\n";

// ---------------------------------------------------------------------------
// PDF upload: every field detected and persisted
// ---------------------------------------------------------------------------
#[test]
fn pdf_upload_is_extracted_detected_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open_json(dir.path().join("tenders.json"));
    let pipeline = Pipeline::new(
        &store,
        extractors_with_pdf_text(Ok(NOTICE)),
        DetectionConfig::default(),
    );
    let upload = staged_file(dir.path(), "upload-1", b"%PDF-1.7");

    let record = pipeline.ingest(&upload, "Street Lights.PDF").unwrap();

    assert_eq!(record.filename, "Street Lights.PDF");
    assert_eq!(record.format, DocumentFormat::Pdf);
    assert_eq!(record.raw_text, NOTICE);
    assert_eq!(record.emd_amount.as_ref().map(|a| a.value), Some(dec!(50000)));
    assert_eq!(record.due_date, NaiveDate::from_ymd_opt(2024, 12, 25));
    assert!(record.summary.as_deref().unwrap().starts_with("Municipal Corporation"));
    assert!(record.warnings.is_empty());

    // A fresh store over the same file sees the same record.
    let reopened = RecordStore::open_json(dir.path().join("tenders.json"));
    assert_eq!(reopened.get(&record.id).unwrap(), record);
}

// ---------------------------------------------------------------------------
// Extraction failure degrades, never aborts
// ---------------------------------------------------------------------------
#[test]
fn failed_extraction_still_creates_a_record() {
    let store = RecordStore::in_memory();
    let pipeline = Pipeline::new(
        &store,
        extractors_with_pdf_text(Err("pdftotext exited with 1")),
        DetectionConfig::default(),
    );
    let dir = tempfile::tempdir().unwrap();
    let upload = staged_file(dir.path(), "scan.pdf", b"%PDF-1.4 scanned");

    let record = pipeline.ingest(&upload, "scan.pdf").unwrap();

    assert!(record.raw_text.is_empty());
    assert_eq!(record.emd_amount, None);
    assert_eq!(record.due_date, None);
    assert_eq!(record.summary, None);
    assert_eq!(record.warnings.len(), 1);
    assert!(record.warnings[0].contains("pdftotext exited with 1"));
    assert_eq!(store.list_all().unwrap().len(), 1);
    assert_eq!(
        tender_core::model::display_or_not_found(record.due_date.as_ref()),
        NOT_FOUND
    );
}

#[test]
fn corrupt_docx_still_creates_a_record() {
    let store = RecordStore::in_memory();
    let pipeline = Pipeline::new(&store, ExtractorSet::default(), DetectionConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let upload = staged_file(dir.path(), "terms.docx", b"PK\x03\x04 truncated");

    let record = pipeline.ingest(&upload, "terms.docx").unwrap();
    assert_eq!(record.format, DocumentFormat::Docx);
    assert!(record.raw_text.is_empty());
    assert!(record.warnings[0].starts_with("docx:"));
}

// ---------------------------------------------------------------------------
// Unreadable uploads fail with the filename and store nothing
// ---------------------------------------------------------------------------
#[test]
fn zero_byte_upload_fails() {
    let store = RecordStore::in_memory();
    let pipeline = Pipeline::new(
        &store,
        extractors_with_pdf_text(Ok(NOTICE)),
        DetectionConfig::default(),
    );
    let dir = tempfile::tempdir().unwrap();
    let upload = staged_file(dir.path(), "empty.pdf", b"");

    let err = pipeline.ingest(&upload, "empty.pdf").unwrap_err();
    match err {
        TenderError::Unreadable { filename, reason } => {
            assert_eq!(filename, "empty.pdf");
            assert_eq!(reason, "file is empty");
        }
        other => panic!("expected Unreadable, got {other:?}"),
    }
    assert!(store.is_empty().unwrap());
}

#[test]
fn missing_upload_fails() {
    let store = RecordStore::in_memory();
    let pipeline = Pipeline::new(&store, ExtractorSet::default(), DetectionConfig::default());
    let err = pipeline
        .ingest(Path::new("/nonexistent/staging/abc"), "notice.pdf")
        .unwrap_err();
    assert!(matches!(err, TenderError::Unreadable { ref filename, .. } if filename == "notice.pdf"));
    assert!(err.to_string().contains("notice.pdf"));
    assert!(store.is_empty().unwrap());
}

// ---------------------------------------------------------------------------
// DOCX end to end with a generated container
// ---------------------------------------------------------------------------
#[test]
fn docx_upload_with_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nit.docx");
    {
        let file = std::fs::File::create(&path).unwrap();
        let mut zw = zip::ZipWriter::new(file);
        zw.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        zw.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Tender for desilting of drains.</w:t></w:r></w:p>
<w:tbl>
<w:tr><w:tc><w:p><w:r><w:t>Earnest Money Deposit</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>&#8377; 1,50,000</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:p><w:r><w:t>Closing Date</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>March 3, 2025</w:t></w:r></w:p></w:tc></w:tr>
</w:tbl>
</w:body></w:document>"#,
        )
        .unwrap();
        zw.finish().unwrap();
    }

    let store = RecordStore::in_memory();
    let settings = Settings {
        uploads_dir: Some(dir.path().join("uploads")),
        ..Settings::default()
    };
    let record = ingest_file(&path, "nit.docx", &store, &settings).unwrap();

    assert_eq!(
        record.raw_text,
        "Tender for desilting of drains.\nEarnest Money Deposit\t₹ 1,50,000\nClosing Date\tMarch 3, 2025\n"
    );
    let emd = record.emd_amount.as_ref().unwrap();
    assert_eq!(emd.value, dec!(150000));
    assert_eq!(emd.currency.as_deref(), Some("INR"));
    assert_eq!(record.due_date, NaiveDate::from_ymd_opt(2025, 3, 3));
    assert_eq!(
        record.summary.as_deref(),
        Some("Tender for desilting of drains. Earnest Money Deposit ₹ 1,50,000 Closing Date March 3, 2025")
    );

    // The original upload is kept next to the store and can be handed back.
    let archive = UploadArchive::new(dir.path().join("uploads"));
    let kept = archive.locate(&record).unwrap();
    assert_eq!(std::fs::read(kept).unwrap(), std::fs::read(&path).unwrap());
}

// ---------------------------------------------------------------------------
// XLSX end to end with a generated two-sheet workbook
// ---------------------------------------------------------------------------
fn write_workbook(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut zw = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    let opts = zip::write::SimpleFileOptions::default();
    let mut sheet_list = String::new();
    let mut rels = String::new();

    for (i, (name, rows)) in sheets.iter().enumerate() {
        let n = i + 1;
        sheet_list.push_str(&format!(r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));

        let mut data = String::new();
        for (r, cells) in rows.iter().enumerate() {
            data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, value) in cells.iter().enumerate() {
                data.push_str(&format!(
                    r#"<c r="{}{}" t="inlineStr"><is><t>{value}</t></is></c>"#,
                    (b'A' + c as u8) as char,
                    r + 1
                ));
            }
            data.push_str("</row>");
        }
        zw.start_file(format!("xl/worksheets/sheet{n}.xml"), opts).unwrap();
        write!(
            zw,
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{data}</sheetData></worksheet>"#
        )
        .unwrap();
    }

    zw.start_file("xl/workbook.xml", opts).unwrap();
    write!(
        zw,
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheet_list}</sheets></workbook>"#
    )
    .unwrap();
    zw.start_file("xl/_rels/workbook.xml.rels", opts).unwrap();
    write!(
        zw,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
    )
    .unwrap();
    zw.finish().unwrap();
}

#[test]
fn xlsx_upload_with_two_sheets() {
    const NIT: &[&[&str]] = &[
        &["Name of Work", "Supply of water meters"],
        &["Earnest Money Deposit", "INR 75,000"],
        &["Bid Submission Closing Date", "15-Jan-2025"],
    ];
    const BOQ: &[&[&str]] = &[&["Item", "Qty", "Rate"], &["Meters", "120 nos", "850.50"]];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staged-boq");
    write_workbook(&path, &[("NIT", NIT), ("BOQ", BOQ)]);

    let store = RecordStore::open_json(dir.path().join("tenders.json"));
    let pipeline = Pipeline::new(&store, ExtractorSet::default(), DetectionConfig::default());
    let record = pipeline.ingest(&path, "Water Meters.xlsx").unwrap();

    assert_eq!(record.format, DocumentFormat::Xlsx);
    assert_eq!(
        record.raw_text,
        "Name of Work\tSupply of water meters\n\
         Earnest Money Deposit\tINR 75,000\n\
         Bid Submission Closing Date\t15-Jan-2025\n\
         Item\tQty\tRate\n\
         Meters\t120 nos\t850.50\n"
    );
    let emd = record.emd_amount.as_ref().unwrap();
    assert_eq!(emd.value, dec!(75000));
    assert_eq!(emd.currency.as_deref(), Some("INR"));
    assert_eq!(record.due_date, NaiveDate::from_ymd_opt(2025, 1, 15));
    assert!(record.warnings.is_empty());

    let preview = record.table_preview(PREVIEW_ROWS, PREVIEW_COLS).unwrap();
    assert_eq!(preview.len(), 5);
    assert_eq!(preview[3], vec!["Item", "Qty", "Rate"]);
}

// ---------------------------------------------------------------------------
// Listing: N saves -> N entries, each retrievable
// ---------------------------------------------------------------------------
#[test]
fn listing_after_many_ingests() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open_json(dir.path().join("db/tenders.json"));
    let pipeline = Pipeline::new(
        &store,
        extractors_with_pdf_text(Ok(NOTICE)),
        DetectionConfig::default(),
    );

    let mut ids = Vec::new();
    for i in 0..5 {
        let upload = staged_file(dir.path(), &format!("u{i}"), b"%PDF");
        ids.push(pipeline.ingest(&upload, &format!("tender-{i}.pdf")).unwrap().id);
    }

    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), 5);
    assert_eq!(listed[0].filename, "tender-4.pdf");
    assert_eq!(listed[4].filename, "tender-0.pdf");
    for summary in &listed {
        let full = store.get(&summary.id).unwrap();
        assert_eq!(full.summary_view(), *summary);
        assert!(ids.contains(&summary.id));
    }
}

// ---------------------------------------------------------------------------
// Detection properties
// ---------------------------------------------------------------------------
#[test]
fn detection_properties() {
    assert_eq!(detect("Closing Date: 31st Febraury 2024").due_date, None);
    assert_eq!(detect("Bid security as per clause 4").emd_amount, None);
    assert_eq!(detect(NOTICE), detect(NOTICE));

    let long = "lorem ".repeat(200);
    let summary = detect(&long).summary.unwrap();
    assert!(summary.chars().count() <= DetectionConfig::default().summary_budget);
    assert!(long[summary.len()..].starts_with(' '));

    // Non-blank text whose first word alone exceeds the budget has no
    // summary; it is never cut mid-word.
    let unbroken = "a".repeat(1000);
    assert_eq!(detect(&unbroken).summary, None);

    assert_eq!(
        detect("Last Date of Submission : 25-Dec-2024").due_date,
        NaiveDate::from_ymd_opt(2024, 12, 25)
    );
}
