//! Result types returned by [`crate::session::WordCloudSession::handle`].

use crate::document::{DocumentKind, UploadDetails};
use crate::pipeline::count::WordCount;
use crate::pipeline::layout::CloudImage;
use serde::Serialize;

/// Everything a request produced.
///
/// A response exists whenever the upload could be read. If rendering failed
/// (no words left, or none fit the canvas), `image` is `None` and
/// `render_error` carries the message to show in its place; the details and
/// word table are still valid.
#[derive(Debug, Clone, Serialize)]
pub struct CloudResponse {
    /// Name, declared type and size of the upload.
    pub details: UploadDetails,

    /// How the upload was parsed.
    pub kind: DocumentKind,

    /// Word → count after stopword removal, in order of first occurrence.
    pub word_counts: WordCount,

    /// The rendered cloud, when rendering succeeded.
    pub image: Option<CloudImage>,

    /// Why there is no image.
    pub render_error: Option<String>,

    pub stats: CloudStats,
}

impl CloudResponse {
    /// `true` when a cloud was rendered and can be exported.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// The `n` most frequent words of the table.
    pub fn top_words(&self, n: usize) -> Vec<(String, usize)> {
        self.word_counts.top(n)
    }
}

/// Sizes and timings of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CloudStats {
    /// Characters of extracted text.
    pub extracted_chars: usize,

    /// Whitespace tokens before stopword removal.
    pub total_tokens: usize,

    /// Tokens that survived stopword removal.
    pub kept_tokens: usize,

    /// Rows of the word table.
    pub distinct_words: usize,

    /// Words handed to the layout engine.
    pub cloud_words: usize,

    /// Rows of the table left out of the cloud by `max_words`.
    pub omitted_words: usize,

    pub extract_duration_ms: u64,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}
