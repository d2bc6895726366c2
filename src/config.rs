//! Configuration types for word-cloud generation.
//!
//! Every option of a request is carried by [`CloudConfig`], built via its
//! [`CloudConfigBuilder`]. The config is plain data (plus an optional progress
//! callback), so the same value can drive any number of uploads.
//!
//! # Design choice: builder over constructor
//! Most callers only touch one or two knobs (the export format, an extra
//! stopword). The builder lets them set just those and rely on the defaults
//! below for the rest.

use crate::error::WordCloudError;
use crate::pipeline::layout::Rgb;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Lowest accepted export resolution, in dots per inch.
pub const MIN_DPI: u32 = 50;
/// Highest accepted export resolution, in dots per inch.
pub const MAX_DPI: u32 = 300;
/// Default export resolution.
pub const DEFAULT_DPI: u32 = 100;

/// Points per inch; canvas sizes are expressed in points.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Largest accepted canvas side, in points (20 in).
///
/// The layout works on a one-pixel-per-point grid and a 300 DPI export of a
/// full-size canvas is 6000 px on a side.
pub const MAX_CANVAS_POINTS: f32 = 1440.0;

/// Check that `dpi` lies within [`MIN_DPI`]..=[`MAX_DPI`].
pub fn validate_dpi(dpi: u32) -> Result<u32, WordCloudError> {
    if (MIN_DPI..=MAX_DPI).contains(&dpi) {
        Ok(dpi)
    } else {
        Err(WordCloudError::InvalidConfig(format!(
            "Resolution must be {MIN_DPI}–{MAX_DPI} DPI, got {dpi}"
        )))
    }
}

// ── Export format ────────────────────────────────────────────────────────

/// File format of an exported cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Rasterised PNG. (default)
    #[default]
    Png,
    /// Rasterised JPEG.
    Jpg,
    /// Vector SVG.
    Svg,
    /// Single-page vector PDF.
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Png, Self::Jpg, Self::Svg, Self::Pdf];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Pdf => "application/pdf",
        }
    }

    /// `true` for the bitmap formats.
    pub fn is_raster(self) -> bool {
        matches!(self, Self::Png | Self::Jpg)
    }

    /// The fixed download name, `wordcloud.<ext>`.
    pub fn file_name(self) -> String {
        format!("wordcloud.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = WordCloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            other => Err(WordCloudError::InvalidConfig(format!(
                "Unknown export format '{other}'. Use png, jpg, svg or pdf."
            ))),
        }
    }
}

// ── Layout options ───────────────────────────────────────────────────────

/// Knobs of the layout engine. Sizes are in PDF points (1/72 in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Canvas width, up to [`MAX_CANVAS_POINTS`]. Default: 720 (10 in).
    pub width: f32,

    /// Canvas height. Default: 432 (6 in).
    pub height: f32,

    /// Canvas background. Default: black.
    pub background: Rgb,

    /// Most words drawn; the rest of the frequency table is ignored. Default: 200.
    pub max_words: usize,

    /// Size of the most frequent word. `None` derives it from the canvas.
    pub max_font_size: Option<f32>,

    /// Layout stops once a word would need to shrink below this. Default: 4.
    pub min_font_size: f32,

    /// How much a word shrinks per failed placement attempt. Must be
    /// positive. Default: 1.
    pub font_step: f32,

    /// Weight of relative frequency in font size, 0.0–1.0. Default: 0.5.
    ///
    /// 0 sizes words by rank only; 1 makes size proportional to frequency.
    pub relative_scaling: f32,

    /// Share of words tried horizontally first, 0.0–1.0. Default: 0.9.
    pub prefer_horizontal: f32,

    /// Empty space kept around each word. Default: 2.
    pub margin: f32,

    /// TrueType/OpenType font to draw with. `None` uses the font bundled
    /// with the layout engine; set this for scripts that font lacks.
    pub font_path: Option<PathBuf>,

    /// Seed of the engine's random choices (orientation, spiral direction).
    /// The same table, options and seed always give the same picture.
    pub seed: u64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 432.0,
            background: Rgb::BLACK,
            max_words: 200,
            max_font_size: None,
            min_font_size: 4.0,
            font_step: 1.0,
            relative_scaling: 0.5,
            prefer_horizontal: 0.9,
            margin: 2.0,
            font_path: None,
            seed: 0,
        }
    }
}

impl LayoutOptions {
    /// Reject values the layout engine cannot work with.
    pub fn validate(&self) -> Result<(), WordCloudError> {
        let invalid = |msg: String| Err(WordCloudError::InvalidConfig(msg));

        if !within(self.width, 1.0, MAX_CANVAS_POINTS)
            || !within(self.height, 1.0, MAX_CANVAS_POINTS)
        {
            return invalid(format!(
                "Canvas must be 1–{MAX_CANVAS_POINTS} pt on each side, got {}x{}",
                self.width, self.height
            ));
        }
        if self.max_words == 0 {
            return invalid("max_words must be ≥ 1".into());
        }
        if !self.min_font_size.is_finite() || self.min_font_size <= 0.0 {
            return invalid(format!(
                "min_font_size must be positive, got {}",
                self.min_font_size
            ));
        }
        if let Some(max) = self.max_font_size {
            if !max.is_finite() || max < self.min_font_size {
                return invalid(format!(
                    "max_font_size ({max}) must be finite and not below min_font_size ({})",
                    self.min_font_size
                ));
            }
        }
        if !self.font_step.is_finite() || self.font_step <= 0.0 {
            return invalid(format!("font_step must be positive, got {}", self.font_step));
        }
        if !within(self.relative_scaling, 0.0, 1.0) {
            return invalid(format!(
                "relative_scaling must be 0.0–1.0, got {}",
                self.relative_scaling
            ));
        }
        if !within(self.prefer_horizontal, 0.0, 1.0) {
            return invalid(format!(
                "prefer_horizontal must be 0.0–1.0, got {}",
                self.prefer_horizontal
            ));
        }
        if !within(self.margin, 0.0, MAX_CANVAS_POINTS) {
            return invalid(format!("margin must be 0–{MAX_CANVAS_POINTS}, got {}", self.margin));
        }
        Ok(())
    }
}

/// `lo <= v <= hi`, false for NaN and infinities.
fn within(v: f32, lo: f32, hi: f32) -> bool {
    v.is_finite() && (lo..=hi).contains(&v)
}

// ── Cloud config ─────────────────────────────────────────────────────────

/// Options for one word-cloud request.
///
/// # Example
/// ```rust
/// use doc_wordcloud::{CloudConfig, ExportFormat};
///
/// let config = CloudConfig::builder()
///     .extra_stopwords(["said", "mr"])
///     .export_format(ExportFormat::Svg)
///     .dpi(150)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 150);
/// ```
#[derive(Clone)]
pub struct CloudConfig {
    /// Filter the standard English stopword list. Default: true.
    ///
    /// When off, only `extra_stopwords` are removed.
    pub use_standard_stopwords: bool,

    /// Additional words to drop, matched case-insensitively.
    pub extra_stopwords: Vec<String>,

    /// Format used by the export action. Default: PNG.
    pub export_format: ExportFormat,

    /// Export resolution. Range: 50–300. Default: 100.
    ///
    /// Raster exports render at `dpi / 72` pixels per point; SVG scales its
    /// width and height attributes. PDF pages are unaffected.
    pub dpi: u32,

    /// Layout engine parameters.
    pub layout: LayoutOptions,

    /// Optional receiver of stage events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            use_standard_stopwords: true,
            extra_stopwords: Vec::new(),
            export_format: ExportFormat::default(),
            dpi: DEFAULT_DPI,
            layout: LayoutOptions::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudConfig")
            .field("use_standard_stopwords", &self.use_standard_stopwords)
            .field("extra_stopwords", &self.extra_stopwords)
            .field("export_format", &self.export_format)
            .field("dpi", &self.dpi)
            .field("layout", &self.layout)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn PipelineProgressCallback>"),
            )
            .finish()
    }
}

impl CloudConfig {
    /// Create a new builder for `CloudConfig`.
    pub fn builder() -> CloudConfigBuilder {
        CloudConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`CloudConfig`].
#[derive(Debug)]
pub struct CloudConfigBuilder {
    config: CloudConfig,
}

impl CloudConfigBuilder {
    pub fn use_standard_stopwords(mut self, v: bool) -> Self {
        self.config.use_standard_stopwords = v;
        self
    }

    pub fn extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extra_stopwords = words
            .into_iter()
            .map(Into::into)
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        self
    }

    pub fn export_format(mut self, format: ExportFormat) -> Self {
        self.config.export_format = format;
        self
    }

    /// Not clamped: out-of-range values are reported by [`Self::build`].
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn layout(mut self, layout: LayoutOptions) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn canvas_size(mut self, width: f32, height: f32) -> Self {
        self.config.layout.width = width.max(1.0);
        self.config.layout.height = height.max(1.0);
        self
    }

    pub fn background(mut self, color: Rgb) -> Self {
        self.config.layout.background = color;
        self
    }

    pub fn max_words(mut self, n: usize) -> Self {
        self.config.layout.max_words = n.max(1);
        self
    }

    pub fn max_font_size(mut self, size: f32) -> Self {
        self.config.layout.max_font_size = Some(size.max(1.0));
        self
    }

    pub fn min_font_size(mut self, size: f32) -> Self {
        self.config.layout.min_font_size = size.max(0.5);
        self
    }

    pub fn font_step(mut self, step: f32) -> Self {
        self.config.layout.font_step = step.max(0.1);
        self
    }

    pub fn relative_scaling(mut self, rs: f32) -> Self {
        self.config.layout.relative_scaling = rs.clamp(0.0, 1.0);
        self
    }

    pub fn prefer_horizontal(mut self, share: f32) -> Self {
        self.config.layout.prefer_horizontal = share.clamp(0.0, 1.0);
        self
    }

    pub fn margin(mut self, margin: f32) -> Self {
        self.config.layout.margin = margin.max(0.0);
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.layout.font_path = Some(path.into());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.layout.seed = seed;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CloudConfig, WordCloudError> {
        validate_dpi(self.config.dpi)?;
        self.config.layout.validate()?;
        Ok(self.config)
    }
}
