//! DOCX reader: paragraphs of the main document body, one per line.

use std::io::{Cursor, Read};

use quick_xml::{Reader as XmlReader, events::Event};
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract body paragraphs from a DOCX container, joined with `\n`.
///
/// Paragraphs nested inside tables or text boxes are skipped so the output lines up with what
/// word processors report as the document's top-level paragraphs.
pub(super) fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| ExtractError::Docx(format!("failed to open archive: {err}")))?;
    let mut document = archive
        .by_name(DOCUMENT_PART)
        .map_err(|err| ExtractError::Docx(format!("missing {DOCUMENT_PART}: {err}")))?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(|err| ExtractError::Docx(format!("failed to read {DOCUMENT_PART}: {err}")))?;

    let paragraphs = collect_paragraphs(&xml)?;
    Ok(paragraphs.join("\n"))
}

fn collect_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = XmlReader::from_str(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    // Depth inside tables and text boxes; their paragraphs are not body paragraphs.
    let mut skip_depth = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                name if is_nested_container(name) => skip_depth += 1,
                _ if skip_depth > 0 => {}
                b"w:p" => current = Some(String::new()),
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                _ if skip_depth > 0 => {}
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if in_run => push_char(&mut current, '\t'),
                b"w:br" | b"w:cr" => push_char(&mut current, '\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text && skip_depth == 0 {
                    if let Some(paragraph) = current.as_mut() {
                        let value = e
                            .unescape()
                            .map_err(|err| ExtractError::Docx(err.to_string()))?;
                        paragraph.push_str(&value);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                name if is_nested_container(name) => skip_depth = skip_depth.saturating_sub(1),
                _ if skip_depth > 0 => {}
                b"w:p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ExtractError::Docx(format!(
                    "failed to parse {DOCUMENT_PART}: {err}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

fn is_nested_container(name: &[u8]) -> bool {
    matches!(name, b"w:tbl" | b"w:txbxContent")
}

fn push_char(paragraph: &mut Option<String>, ch: char) {
    if let Some(paragraph) = paragraph.as_mut() {
        paragraph.push(ch);
    }
}
