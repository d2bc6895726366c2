//! PDF text extraction.
//!
//! pdfium is the primary backend: its text layer handles ligatures, ToUnicode
//! maps and odd encodings far better than a pure-Rust parser. When the pdfium
//! shared library cannot be bound, extraction degrades to `lopdf` instead of
//! failing outright.
//!
//! Pages are concatenated in document order with **no** separator, so a word
//! split across a page break may merge with its neighbour.

use crate::engine;
use crate::error::WordCloudError;
use pdfium_render::prelude::*;
use tracing::{debug, info, warn};

/// The PDF header may be preceded by junk; readers accept it within the
/// first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

fn corrupt(name: &str, detail: impl Into<String>) -> WordCloudError {
    WordCloudError::CorruptDocument {
        name: name.to_string(),
        kind: "PDF",
        detail: detail.into(),
    }
}

/// `true` when `%PDF` appears near the start of `bytes`.
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(4).any(|w| w == b"%PDF")
}

/// Extract the text of every page, concatenated in page order.
pub fn extract_pdf_text(name: &str, bytes: &[u8]) -> Result<String, WordCloudError> {
    if !has_pdf_header(bytes) {
        let magic: Vec<u8> = bytes.iter().take(4).copied().collect();
        return Err(corrupt(name, format!("missing %PDF header, first bytes: {magic:?}")));
    }

    match engine::pdfium() {
        Ok(pdfium) => extract_with_pdfium(pdfium, name, bytes),
        Err(e) => {
            debug!("Falling back to lopdf text extraction: {e}");
            extract_with_lopdf(name, bytes)
        }
    }
}

fn extract_with_pdfium(pdfium: &Pdfium, name: &str, bytes: &[u8]) -> Result<String, WordCloudError> {
    let document = pdfium.load_pdf_from_byte_slice(bytes, None).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            corrupt(name, "document is encrypted and needs a password")
        } else {
            corrupt(name, err_str)
        }
    })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut text = String::new();
    for (idx, page) in pages.iter().enumerate() {
        let page_text = page
            .text()
            .map_err(|e| corrupt(name, format!("page {}: {:?}", idx + 1, e)))?;
        let page_text = page_text.all();
        debug!("Page {} → {} chars", idx + 1, page_text.len());
        text.push_str(&page_text);
    }

    Ok(text)
}

/// Pure-Rust extraction used when pdfium is unavailable.
pub fn extract_with_lopdf(name: &str, bytes: &[u8]) -> Result<String, WordCloudError> {
    let document = lopdf::Document::load_mem(bytes).map_err(|e| corrupt(name, e.to_string()))?;
    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    info!("PDF loaded (lopdf): {} pages", page_numbers.len());

    let mut text = String::new();
    for page in page_numbers {
        match document.extract_text(&[page]) {
            Ok(page_text) => {
                debug!("Page {} → {} chars", page, page_text.len());
                text.push_str(&page_text);
            }
            Err(e) => warn!("Skipping text of page {}: {}", page, e),
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// A PDF with one Helvetica text run per page.
    fn text_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn header_detection() {
        assert!(has_pdf_header(b"%PDF-1.7\n..."));
        assert!(has_pdf_header(b"\xEF\xBB\xBF%PDF-1.4"));
        assert!(!has_pdf_header(b"PK\x03\x04"));
        assert!(!has_pdf_header(b""));
    }

    #[test]
    fn non_pdf_bytes_are_rejected() {
        let err = extract_pdf_text("fake.pdf", b"hello world").unwrap_err();
        assert!(matches!(err, WordCloudError::CorruptDocument { kind: "PDF", .. }));
        assert!(err.to_string().contains("fake.pdf"));
    }

    #[test]
    fn truncated_pdf_is_corrupt_for_lopdf() {
        let err = extract_with_lopdf("broken.pdf", b"%PDF-1.5\n1 0 obj\n<<").unwrap_err();
        assert!(matches!(err, WordCloudError::CorruptDocument { .. }));
    }

    #[test]
    fn lopdf_concatenates_pages_in_order() {
        let both = extract_with_lopdf("two.pdf", &text_pdf(&["alpha", "beta"])).unwrap();
        let first = extract_with_lopdf("a.pdf", &text_pdf(&["alpha"])).unwrap();
        let second = extract_with_lopdf("b.pdf", &text_pdf(&["beta"])).unwrap();
        assert_eq!(both, format!("{first}{second}"));

        let alpha = both.find("alpha").unwrap();
        let beta = both.find("beta").unwrap();
        assert!(alpha < beta, "{both:?}");
    }

    #[test]
    fn pdfium_concatenates_pages_without_separator() {
        if !engine::pdfium_available() {
            println!("SKIP: PDFium not available");
            return;
        }
        let text = extract_pdf_text("two.pdf", &text_pdf(&["alpha", "beta"])).unwrap();
        assert!(text.contains("alphabeta"), "{text:?}");
    }
}
