//! Error types for the doc-wordcloud library.
//!
//! A single fatal-error enum, [`WordCloudError`], covers every stage. How far
//! a failure reaches depends on where it is raised, not on its type:
//!
//! * Extraction failures (`UnsupportedFormat`, `DecodeError`,
//!   `CorruptDocument`) stop the whole request.
//! * Render failures (`EmptyInput`, `NoSpaceToDraw`) stop only the render
//!   step; [`crate::session::WordCloudSession::handle`] still returns the
//!   upload details and word table alongside the message.
//! * Export failures stop only the export action.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the doc-wordcloud library.
#[derive(Debug, Error)]
pub enum WordCloudError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The upload is neither plain text, PDF, nor a Word document.
    #[error("File type not supported: '{name}' ({declared})\nUpload a .txt, .pdf or .docx file.")]
    UnsupportedFormat { name: String, declared: String },

    /// A plain-text upload is not valid UTF-8.
    #[error("'{name}' is not valid UTF-8 text: {detail}")]
    DecodeError { name: String, detail: String },

    /// A PDF or Word document could not be parsed.
    #[error("'{name}' could not be read as {kind}: {detail}")]
    CorruptDocument {
        name: String,
        kind: &'static str,
        detail: String,
    },

    // ── Render errors ─────────────────────────────────────────────────────
    /// Nothing is left to draw once stopwords are removed.
    #[error("No words left to draw after removing stopwords.\nTry turning the standard stopword list off or removing extra stopwords.")]
    EmptyInput,

    /// Not even the most frequent word fits on the canvas.
    #[error("Couldn't find space to draw on a {width}x{height} pt canvas.\nIncrease the canvas size or lower the minimum font size.")]
    NoSpaceToDraw { width: u32, height: u32 },

    /// The pdfium shared library could not be bound. PDF text extraction
    /// falls back to `lopdf` when this happens.
    #[error(
        "PDFium library unavailable: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium for the best PDF text extraction.\n"
    )]
    PdfiumUnavailable(String),

    // ── Export errors ─────────────────────────────────────────────────────
    /// An encoder (PDF writer, PNG/JPEG encoder) failed.
    #[error("Failed to export {format}: {detail}")]
    ExportFailed { format: String, detail: String },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or option validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WordCloudError {
    /// `true` for failures that only stop the render step.
    pub fn is_render_failure(&self) -> bool {
        matches!(
            self,
            WordCloudError::EmptyInput | WordCloudError::NoSpaceToDraw { .. }
        )
    }
}
