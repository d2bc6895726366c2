//! Word (`.docx`) text extraction.
//!
//! A `.docx` file is a zip archive; the body lives in `word/document.xml`.
//! Only *body-level* paragraphs (`w:p` elements directly under `w:body`)
//! count, which leaves out paragraphs nested inside tables and text boxes.
//! Paragraph texts are concatenated with no separator.
//!
//! Inside a paragraph, `w:t` runs are appended verbatim, `w:tab` becomes a
//! tab and `w:br` / `w:cr` become newlines. Tab *stops* declared in
//! paragraph properties are not content and are skipped.

use crate::error::WordCloudError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

fn corrupt(name: &str, detail: impl Into<String>) -> WordCloudError {
    WordCloudError::CorruptDocument {
        name: name.to_string(),
        kind: "Word document",
        detail: detail.into(),
    }
}

/// Extract the concatenated text of every body-level paragraph.
pub fn extract_docx_text(name: &str, bytes: &[u8]) -> Result<String, WordCloudError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| corrupt(name, format!("not a zip archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| corrupt(name, format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| corrupt(name, format!("unreadable {DOCUMENT_PART}: {e}")))?;

    let paragraphs = body_paragraphs(&xml).map_err(|e| corrupt(name, e.to_string()))?;
    debug!("Word document: {} paragraphs", paragraphs.len());
    Ok(paragraphs.concat())
}

/// Text of each body-level paragraph, in document order.
pub fn body_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    // (stack depth at which the open paragraph started, its text so far)
    let mut current: Option<(usize, String)> = None;
    let mut paragraphs = Vec::new();

    let parent_is = |stack: &[Vec<u8>], name: &[u8]| stack.last().map(Vec::as_slice) == Some(name);
    let in_text_box = |stack: &[Vec<u8>]| stack.iter().any(|n| n.as_slice() == b"txbxContent");

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let local = e.local_name().as_ref().to_vec();
                if local == b"p" && current.is_none() && parent_is(&stack, b"body") {
                    current = Some((stack.len(), String::new()));
                }
                stack.push(local);
            }
            Event::Empty(e) => {
                let local = e.local_name();
                match (local.as_ref(), current.as_mut()) {
                    (b"p", None) if parent_is(&stack, b"body") => paragraphs.push(String::new()),
                    (b"tab", Some((_, text))) if parent_is(&stack, b"r") => text.push('\t'),
                    (b"br" | b"cr", Some((_, text))) if parent_is(&stack, b"r") => text.push('\n'),
                    _ => {}
                }
            }
            Event::Text(t) => {
                if let Some((_, text)) = current.as_mut() {
                    if parent_is(&stack, b"t") && !in_text_box(&stack) {
                        text.push_str(&t.unescape()?);
                    }
                }
            }
            Event::End(_) => {
                stack.pop();
                if current.as_ref().is_some_and(|(depth, _)| *depth == stack.len()) {
                    if let Some((_, text)) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
