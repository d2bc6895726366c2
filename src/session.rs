//! Request handling: one upload in, one [`CloudResponse`] out.
//!
//! ## Why a session object?
//!
//! A request always runs the same four stages in strict order:
//! extract → filter → count → render. The session holds what stays fixed
//! between requests (the config and the two pluggable engines) and nothing
//! else, so every upload is processed from scratch and no state leaks from
//! one to the next.
//!
//! Export is a separate action on an already rendered [`CloudImage`]; a
//! client can show the cloud first and export only when asked.

use crate::config::{CloudConfig, ExportFormat};
use crate::document::Document;
use crate::error::WordCloudError;
use crate::output::{CloudResponse, CloudStats};
use crate::pipeline::count::WordCount;
use crate::pipeline::export::{self, ExportedFile};
use crate::pipeline::extract::{self, DefaultParser, DocumentParser};
use crate::pipeline::layout::{CloudImage, CloudLayout, WcloudLayout};
use crate::pipeline::render;
use crate::pipeline::stopwords::StopwordSet;
use crate::progress::{PipelineProgressCallback, Stage};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Runs word-cloud requests against a fixed configuration.
///
/// # Example
/// ```rust,no_run
/// use doc_wordcloud::{CloudConfig, Document, WordCloudSession};
///
/// let session = WordCloudSession::new(CloudConfig::default());
/// let doc = Document::from_path("speech.txt")?;
/// let response = session.handle(&doc)?;
/// for (word, count) in response.top_words(10) {
///     println!("{word}: {count}");
/// }
/// if let Some(image) = &response.image {
///     session.export_to_file(image, "wordcloud.png")?;
/// }
/// # Ok::<(), doc_wordcloud::WordCloudError>(())
/// ```
pub struct WordCloudSession {
    config: CloudConfig,
    parser: Box<dyn DocumentParser>,
    layout: Box<dyn CloudLayout>,
}

impl std::fmt::Debug for WordCloudSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordCloudSession")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for WordCloudSession {
    fn default() -> Self {
        Self::new(CloudConfig::default())
    }
}

impl WordCloudSession {
    /// A session using the built-in parser and [`WcloudLayout`].
    pub fn new(config: CloudConfig) -> Self {
        Self {
            config,
            parser: Box::new(DefaultParser),
            layout: Box::new(WcloudLayout),
        }
    }

    /// Replace the document parser.
    pub fn with_parser(mut self, parser: impl DocumentParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Replace the layout engine.
    pub fn with_layout(mut self, layout: impl CloudLayout + 'static) -> Self {
        self.layout = Box::new(layout);
        self
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    fn notify(&self, event: impl FnOnce(&dyn PipelineProgressCallback)) {
        if let Some(cb) = &self.config.progress_callback {
            event(cb.as_ref());
        }
    }

    /// Run extract → filter → count → render for one upload.
    ///
    /// # Errors
    /// Fails only when the upload itself cannot be used: unsupported type,
    /// undecodable text, or a corrupt PDF/Word file. Render failures are
    /// reported inside the response instead.
    pub fn handle(&self, document: &Document) -> Result<CloudResponse, WordCloudError> {
        let total_start = Instant::now();
        let details = document.details();
        info!(
            "Handling upload '{}' ({} bytes, type '{}')",
            details.file_name, details.file_size, details.file_type
        );

        // ── Step 1: Extract ──────────────────────────────────────────────
        let kind = document.kind()?;
        self.notify(|cb| cb.on_stage_start(Stage::Extract));
        let extract_start = Instant::now();
        let text = extract::extract_with(self.parser.as_ref(), document).inspect_err(|e| {
            self.notify(|cb| cb.on_stage_error(Stage::Extract, &e.to_string()))
        })?;
        let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
        self.notify(|cb| {
            cb.on_stage_complete(Stage::Extract, &format!("{} chars", text.chars().count()))
        });

        // ── Step 2: Filter ───────────────────────────────────────────────
        self.notify(|cb| cb.on_stage_start(Stage::Filter));
        let stopwords =
            StopwordSet::build(self.config.use_standard_stopwords, &self.config.extra_stopwords);
        let filtered = stopwords.filter(&text);
        let total_tokens = text.split_whitespace().count();
        let kept_tokens = filtered.split_whitespace().count();
        self.notify(|cb| {
            cb.on_stage_complete(
                Stage::Filter,
                &format!("{kept_tokens} of {total_tokens} tokens kept"),
            )
        });

        // ── Step 3: Count ────────────────────────────────────────────────
        self.notify(|cb| cb.on_stage_start(Stage::Count));
        let word_counts = WordCount::from_text(&filtered);
        self.notify(|cb| {
            cb.on_stage_complete(Stage::Count, &format!("{} distinct words", word_counts.len()))
        });

        // ── Step 4: Render ───────────────────────────────────────────────
        self.notify(|cb| cb.on_stage_start(Stage::Render));
        let render_start = Instant::now();
        let (image, render_error) =
            match render::render_counts(self.layout.as_ref(), &word_counts, &self.config.layout) {
                Ok(image) => {
                    self.notify(|cb| {
                        cb.on_stage_complete(
                            Stage::Render,
                            &format!("{} words drawn", image.words.len()),
                        )
                    });
                    (Some(image), None)
                }
                Err(e) if e.is_render_failure() => {
                    warn!("Render failed: {}", e);
                    self.notify(|cb| cb.on_stage_error(Stage::Render, &e.to_string()));
                    (None, Some(e.to_string()))
                }
                Err(e) => {
                    self.notify(|cb| cb.on_stage_error(Stage::Render, &e.to_string()));
                    return Err(e);
                }
            };
        let render_duration_ms = render_start.elapsed().as_millis() as u64;

        let stats = CloudStats {
            extracted_chars: text.chars().count(),
            total_tokens,
            kept_tokens,
            distinct_words: word_counts.len(),
            cloud_words: image.as_ref().map_or(0, |i| i.words.len()),
            omitted_words: image.as_ref().map_or(0, |i| i.omitted_words),
            extract_duration_ms,
            render_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        };
        info!(
            "Request complete: {} distinct words, {} in the cloud, {}ms",
            stats.distinct_words, stats.cloud_words, stats.total_duration_ms
        );

        Ok(CloudResponse {
            details,
            kind,
            word_counts,
            image,
            render_error,
            stats,
        })
    }

    /// Read `path` from disk and [`handle`](Self::handle) it.
    pub fn handle_path(&self, path: impl AsRef<Path>) -> Result<CloudResponse, WordCloudError> {
        let document = Document::from_path(path)?;
        self.handle(&document)
    }

    /// Export with the configured format and resolution.
    pub fn export(&self, image: &CloudImage) -> Result<ExportedFile, WordCloudError> {
        self.export_as(image, self.config.export_format, self.config.dpi)
    }

    /// Export with an explicit format and resolution.
    pub fn export_as(
        &self,
        image: &CloudImage,
        format: ExportFormat,
        dpi: u32,
    ) -> Result<ExportedFile, WordCloudError> {
        self.notify(|cb| cb.on_stage_start(Stage::Export));
        match export::export(image, format, dpi) {
            Ok(file) => {
                self.notify(|cb| {
                    cb.on_stage_complete(
                        Stage::Export,
                        &format!("{} ({} bytes)", file.file_name, file.bytes.len()),
                    )
                });
                Ok(file)
            }
            Err(e) => {
                self.notify(|cb| cb.on_stage_error(Stage::Export, &e.to_string()));
                Err(e)
            }
        }
    }

    /// Export and write the result to `output_path`.
    ///
    /// Uses atomic write (temp file + rename) to prevent partial files.
    pub fn export_to_file(
        &self,
        image: &CloudImage,
        output_path: impl AsRef<Path>,
    ) -> Result<ExportedFile, WordCloudError> {
        let file = self.export(image)?;
        write_atomically(output_path.as_ref(), &file.bytes)?;
        Ok(file)
    }
}

/// Convenience wrapper: handle one document with `config`.
pub fn generate(document: &Document, config: &CloudConfig) -> Result<CloudResponse, WordCloudError> {
    WordCloudSession::new(config.clone()).handle(document)
}

/// Convenience wrapper: read `path` and handle it with `config`.
pub fn generate_from_path(
    path: impl AsRef<Path>,
    config: &CloudConfig,
) -> Result<CloudResponse, WordCloudError> {
    WordCloudSession::new(config.clone()).handle_path(path)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), WordCloudError> {
    let write_failed = |source: std::io::Error| WordCloudError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, bytes).map_err(write_failed)?;
    std::fs::rename(&tmp_path, path).map_err(write_failed)?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
