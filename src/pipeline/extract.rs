//! Text extraction: document bytes → one plain-text string.
//!
//! The format-specific work sits behind [`DocumentParser`] so a different
//! parsing backend can be swapped in without touching the rest of the
//! pipeline. [`DefaultParser`] dispatches to the pdfium/lopdf PDF reader, the
//! zip + XML Word reader, or UTF-8 decoding.

use crate::document::{Document, DocumentKind};
use crate::error::WordCloudError;
use crate::pipeline::{docx, pdf};
use tracing::{debug, info};

/// Turns the bytes of a document of a known kind into text.
pub trait DocumentParser: Send + Sync {
    fn parse_document(
        &self,
        name: &str,
        bytes: &[u8],
        kind: DocumentKind,
    ) -> Result<String, WordCloudError>;
}

/// The built-in parser for plain text, PDF and `.docx`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultParser;

impl DocumentParser for DefaultParser {
    fn parse_document(
        &self,
        name: &str,
        bytes: &[u8],
        kind: DocumentKind,
    ) -> Result<String, WordCloudError> {
        match kind {
            DocumentKind::PlainText => decode_text(name, bytes),
            DocumentKind::Pdf => pdf::extract_pdf_text(name, bytes),
            DocumentKind::Docx => docx::extract_docx_text(name, bytes),
        }
    }
}

/// Decode a plain-text upload as UTF-8, dropping a leading byte-order mark.
pub fn decode_text(name: &str, bytes: &[u8]) -> Result<String, WordCloudError> {
    let text = std::str::from_utf8(bytes).map_err(|e| WordCloudError::DecodeError {
        name: name.to_string(),
        detail: e.to_string(),
    })?;
    Ok(text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string())
}

/// Extract the text of `document` with the built-in parser.
pub fn extract(document: &Document) -> Result<String, WordCloudError> {
    extract_with(&DefaultParser, document)
}

/// Extract the text of `document` with a caller-supplied parser.
pub fn extract_with(
    parser: &dyn DocumentParser,
    document: &Document,
) -> Result<String, WordCloudError> {
    let kind = document.kind()?;
    debug!("Extracting {} ({})", document.name, kind.label());
    let text = parser.parse_document(&document.name, &document.bytes, kind)?;
    info!("Extracted {} chars from {}", text.len(), document.name);
    Ok(text)
}
