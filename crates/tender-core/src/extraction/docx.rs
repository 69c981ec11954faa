use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::TenderError;
use crate::extraction::TextExtractor;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the main document part of a .docx container.
///
/// Paragraphs come out one per line in document order. Tables are flattened
/// row by row: paragraphs inside a cell are joined with spaces, cells are
/// separated by tabs and each row ends with a newline.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, path: &Path) -> Result<String, TenderError> {
        let file = File::open(path)
            .map_err(|e| TenderError::ExtractionFailed(format!("cannot open docx: {e}")))?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| TenderError::MalformedDocument(format!("not a docx container: {e}")))?;
        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| {
            TenderError::MalformedDocument(format!("missing {DOCUMENT_PART}: {e}"))
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| TenderError::MalformedDocument(format!("unreadable {DOCUMENT_PART}: {e}")))?;

        document_text(&xml)
    }

    fn backend_name(&self) -> &str {
        "docx"
    }
}

/// Flatten WordprocessingML body XML into plain text.
fn document_text(xml: &str) -> Result<String, TenderError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;
    let mut in_tab_stops = false;
    let mut cell_depth: usize = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"tabs" => in_tab_stops = true,
                b"tc" => cell_depth += 1,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"tabs" => in_tab_stops = false,
                b"p" => end_paragraph(&mut out, cell_depth),
                b"tc" => {
                    cell_depth = cell_depth.saturating_sub(1);
                    trim_trailing(&mut out, ' ');
                    out.push('\t');
                }
                b"tr" => {
                    trim_trailing(&mut out, '\t');
                    out.push('\n');
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" if !in_tab_stops => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                b"p" => end_paragraph(&mut out, cell_depth),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|err| {
                    TenderError::MalformedDocument(format!("bad text in {DOCUMENT_PART}: {err}"))
                })?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TenderError::MalformedDocument(format!(
                    "invalid XML in {DOCUMENT_PART} at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    Ok(out)
}

fn end_paragraph(out: &mut String, cell_depth: usize) {
    if cell_depth > 0 {
        out.push(' ');
    } else {
        out.push('\n');
    }
}

fn trim_trailing(out: &mut String, c: char) {
    while out.ends_with(c) {
        out.pop();
    }
}
