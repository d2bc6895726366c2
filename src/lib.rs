//! # doc-wordcloud
//!
//! Turn a plain-text, PDF or Word document into a word cloud.
//!
//! ## Why this crate?
//!
//! A word cloud is a quick way to see what a document is about before reading
//! it. This crate does the whole job in one call: it pulls the text out of
//! the upload, drops common English filler words, counts what is left and
//! lays the words out on a canvas, sized by frequency. The result can be
//! exported as PNG, JPG, SVG or PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Document (.txt / .pdf / .docx)
//!  │
//!  ├─ 1. Extract  UTF-8 decode, pdfium (lopdf fallback), or zip + XML
//!  ├─ 2. Filter   baseline stopwords ∪ extra words, case-insensitive
//!  ├─ 3. Count    case-sensitive word table, first-occurrence order
//!  ├─ 4. Render   wcloud layout on a 720×432 pt canvas
//!  └─ 5. Export   PNG/JPG (image) · SVG · PDF (lopdf), bitmap at the chosen DPI
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc_wordcloud::{CloudConfig, ExportFormat, WordCloudSession};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CloudConfig::builder()
//!         .extra_stopwords(["said", "mr"])
//!         .export_format(ExportFormat::Svg)
//!         .build()?;
//!     let session = WordCloudSession::new(config);
//!
//!     let response = session.handle_path("report.pdf")?;
//!     for (word, count) in response.top_words(5) {
//!         println!("{word:>12} {count}");
//!     }
//!     match &response.image {
//!         Some(image) => {
//!             session.export_to_file(image, "wordcloud.svg")?;
//!         }
//!         None => eprintln!("{}", response.render_error.unwrap_or_default()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `wordcloud` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! doc-wordcloud = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! PDF text extraction uses the PDFium shared library, located at runtime
//! (see the `pdfium-locate` crate; `PDFIUM_LIB_PATH` overrides the search).
//! Without it, PDF text comes from `lopdf`. Exports never need PDFium.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CloudConfig, CloudConfigBuilder, ExportFormat, LayoutOptions};
pub use document::{Document, DocumentKind, UploadDetails};
pub use error::WordCloudError;
pub use output::{CloudResponse, CloudStats};
pub use pipeline::count::{count, WordCount, WordRow};
pub use pipeline::export::{export, ExportedFile};
pub use pipeline::extract::{extract, DefaultParser, DocumentParser};
pub use pipeline::layout::{CloudImage, CloudLayout, Rgb, WcloudLayout};
pub use pipeline::render::render;
pub use pipeline::stopwords::{filter_stopwords, StopwordSet, SUGGESTED_EXTRA_STOPWORDS};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback, Stage};
pub use session::{generate, generate_from_path, WordCloudSession};
