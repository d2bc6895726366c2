//! Process-wide PDFium handle.
//!
//! pdfium initialises global library state on bind and tears it down when the
//! `Pdfium` value is dropped, so two live instances would step on each other.
//! The library is bound at most once per process and shared from then on.
//! A failed bind is remembered too; callers get the same error every time
//! instead of paying for a fresh library search on each request.

use crate::error::WordCloudError;
use pdfium_render::prelude::Pdfium;
use std::sync::OnceLock;
use tracing::{info, warn};

static PDFIUM: OnceLock<Result<Pdfium, String>> = OnceLock::new();

/// The shared PDFium instance, binding it on first use.
pub fn pdfium() -> Result<&'static Pdfium, WordCloudError> {
    PDFIUM
        .get_or_init(|| match pdfium_locate::bind_pdfium() {
            Ok(pdfium) => {
                info!("PDFium library bound");
                Ok(pdfium)
            }
            Err(e) => {
                warn!("PDFium unavailable: {e}");
                Err(e.to_string())
            }
        })
        .as_ref()
        .map_err(|reason| WordCloudError::PdfiumUnavailable(reason.clone()))
}

/// `true` when the PDFium library can be (or already has been) bound.
pub fn pdfium_available() -> bool {
    pdfium().is_ok()
}
