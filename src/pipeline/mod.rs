//! Pipeline stages for word-cloud generation.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the two pluggable engines ([`extract::DocumentParser`]
//! and [`layout::CloudLayout`]) can be swapped without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ stopwords ──▶ count ──▶ render ──▶ export
//! (txt/pdf/docx) (filter)   (table)   (layout)   (pdf/svg/png/jpg)
//! ```
//!
//! 1. [`extract`]: document bytes to one text string; [`pdf`] and [`docx`]
//!    hold the format readers
//! 2. [`stopwords`]: drop baseline and user-chosen words, case-insensitively
//! 3. [`count`]: case-sensitive word table in first-occurrence order
//! 4. [`render`]: keep the most frequent rows and draw them with [`layout`]
//! 5. [`export`]: resample the bitmap and wrap it as PNG/JPG, [`svg`] or
//!    [`pdfgen`]; [`encode`] holds the encoders and download links

pub mod count;
pub mod docx;
pub mod encode;
pub mod export;
pub mod extract;
pub mod layout;
pub mod pdf;
pub mod pdfgen;
pub mod render;
pub mod stopwords;
pub mod svg;
