//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::CloudConfigBuilder::progress_callback`] to hear about
//! each stage of a request as it starts and finishes.
//!
//! # Why callbacks instead of return values?
//!
//! A PDF with hundreds of pages can take a while to extract, and a dense cloud
//! takes a while to lay out. The callback lets a host drive a spinner or log
//! stage timings without the library knowing how it reports them.
//!
//! # Example
//!
//! ```rust
//! use doc_wordcloud::{CloudConfig, PipelineProgressCallback, Stage};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl PipelineProgressCallback for CountingCallback {
//!     fn on_stage_complete(&self, stage: Stage, detail: &str) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{stage} done: {detail}");
//!     }
//! }
//!
//! let config = CloudConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// One step of a word-cloud request, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Extract,
    Filter,
    Count,
    Render,
    Export,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Extract => "Extracting text",
            Stage::Filter => "Removing stopwords",
            Stage::Count => "Counting words",
            Stage::Render => "Laying out cloud",
            Stage::Export => "Exporting",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Called by the session as a request moves through its stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync` so one config
/// can be shared between threads.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called when a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage succeeds.
    ///
    /// # Arguments
    /// * `stage`: the stage that finished
    /// * `detail`: a short human-readable summary (e.g. "1,204 words")
    fn on_stage_complete(&self, stage: Stage, detail: &str) {
        let _ = (stage, detail);
    }

    /// Called when a stage fails. For the render stage the request still
    /// produces a response.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CloudConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;
