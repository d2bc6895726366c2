//! Word-cloud drawing: frequency rows → bitmap.
//!
//! Placement and glyph rasterising are delegated to the `wcloud` crate,
//! wrapped by [`WcloudLayout`]. Words are visited from most to least
//! frequent, sized by relative frequency, and put at a free spot picked by
//! the seeded RNG; a word that does not fit shrinks by `font_step` until it
//! would go below `min_font_size`, at which point the layout stops.
//!
//! Any other engine can be plugged in through [`CloudLayout`]. The result of
//! a render is a [`CloudImage`]: the words that were handed to the engine
//! plus a bitmap that the exporters resample to the requested DPI.

use crate::config::{LayoutOptions, POINTS_PER_INCH};
use crate::error::WordCloudError;
use crate::pipeline::count::WordRow;
use ab_glyph::FontVec;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;
use wcloud::{Tokenizer, WordCloud, WordCloudSize};

// ── Colour ───────────────────────────────────────────────────────────────

/// An opaque sRGB colour, serialised as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb`, `black` or `white`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "black" => return Some(Self::BLACK),
            "white" => return Some(Self::WHITE),
            _ => {}
        }
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |h: &str| u8::from_str_radix(h, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }

    /// Opaque pixel value.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = WordCloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| {
            WordCloudError::InvalidConfig(format!(
                "Invalid colour '{s}'. Use #rrggbb, #rgb, black or white."
            ))
        })
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> String {
        c.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = WordCloudError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Key colours of the viridis map, dark purple to yellow.
const VIRIDIS: [Rgb; 5] = [
    Rgb::new(68, 1, 84),
    Rgb::new(59, 82, 139),
    Rgb::new(33, 145, 140),
    Rgb::new(94, 201, 98),
    Rgb::new(253, 231, 37),
];

/// Sample the viridis map at `t` in 0.0–1.0.
pub fn viridis(t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f32;
    let i = (t.floor() as usize).min(VIRIDIS.len() - 2);
    VIRIDIS[i].lerp(VIRIDIS[i + 1], t - i as f32)
}

/// Colour of `word`: a fixed point on the viridis map, so a word keeps its
/// colour across renders and resolutions.
pub fn word_color(word: &str) -> Rgb {
    viridis(word_unit(word))
}

/// A deterministic value in 0.0..1.0 derived from `word` (FNV-1a).
fn word_unit(word: &str) -> f32 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in word.bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    (h >> 40) as f32 / (1u64 << 24) as f32
}

// ── Output model ─────────────────────────────────────────────────────────

/// A rendered cloud, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudImage {
    /// Canvas width in points.
    pub width: f32,
    /// Canvas height in points.
    pub height: f32,
    pub background: Rgb,
    /// Rows handed to the layout engine, most frequent first.
    pub words: Vec<WordRow>,
    /// Rows of the word table left out by `max_words`.
    pub omitted_words: usize,
    /// The drawing, at [`CloudImage::bitmap_scale`] pixels per point.
    #[serde(skip)]
    pub bitmap: RgbaImage,
}

impl CloudImage {
    /// Pixels per point of [`Self::bitmap`].
    pub fn bitmap_scale(&self) -> f32 {
        self.bitmap.width() as f32 / self.width
    }

    /// Pixel size of the canvas at `dpi`.
    pub fn pixel_size(&self, dpi: u32) -> (u32, u32) {
        let scale = dpi as f32 / POINTS_PER_INCH;
        let px = |pt: f32| ((pt * scale).round() as u32).max(1);
        (px(self.width), px(self.height))
    }

    /// The drawing resampled to `dpi`.
    pub fn bitmap_at(&self, dpi: u32) -> RgbaImage {
        let (w, h) = self.pixel_size(dpi);
        if (w, h) == self.bitmap.dimensions() {
            return self.bitmap.clone();
        }
        imageops::resize(&self.bitmap, w, h, FilterType::Lanczos3)
    }
}

// ── Layout trait ─────────────────────────────────────────────────────────

/// Draws the rows of a frequency table on a canvas.
pub trait CloudLayout: Send + Sync {
    /// `rows` are most frequent first. The bitmap is `options.width` by
    /// `options.height` points at `scale` pixels per point. Fails with
    /// `EmptyInput` when nothing is drawable and `NoSpaceToDraw` when the
    /// canvas cannot hold a word at `min_font_size`.
    fn draw(
        &self,
        rows: &[WordRow],
        options: &LayoutOptions,
        scale: f32,
    ) -> Result<RgbaImage, WordCloudError>;
}

/// The default engine, backed by `wcloud`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WcloudLayout;

impl CloudLayout for WcloudLayout {
    fn draw(
        &self,
        rows: &[WordRow],
        options: &LayoutOptions,
        scale: f32,
    ) -> Result<RgbaImage, WordCloudError> {
        options.validate()?;

        let drawable: Vec<&WordRow> = rows
            .iter()
            .filter(|r| r.count > 0 && r.word.chars().any(char::is_alphanumeric))
            .collect();
        if drawable.is_empty() {
            return Err(WordCloudError::EmptyInput);
        }
        if options.min_font_size > options.width.min(options.height) {
            return Err(WordCloudError::NoSpaceToDraw {
                width: options.width.round() as u32,
                height: options.height.round() as u32,
            });
        }

        let tokenizer = Tokenizer::default()
            .with_filter(HashSet::new())
            .with_max_words(u32::try_from(drawable.len()).unwrap_or(u32::MAX));

        let mut cloud = WordCloud::default()
            .with_tokenizer(tokenizer)
            .with_background_color(options.background.to_rgba())
            .with_min_font_size(options.min_font_size)
            .with_max_font_size(options.max_font_size)
            .with_font_step(options.font_step)
            .with_word_margin(options.margin.round() as u32)
            .with_word_rotate_chance(f64::from(1.0 - options.prefer_horizontal))
            .with_relative_font_scaling(options.relative_scaling)
            .with_rng_seed(options.seed);
        if let Some(path) = &options.font_path {
            cloud = cloud.with_font(load_font(path)?);
        }

        let size = WordCloudSize::FromDimensions {
            width: options.width.round() as u32,
            height: options.height.round() as u32,
        };
        debug!(
            "wcloud: {} words on {}x{} pt at {scale:.2} px/pt",
            drawable.len(),
            options.width,
            options.height
        );
        Ok(cloud.generate_from_text_with_color_func(
            &frequency_text(&drawable),
            size,
            scale,
            |word, _| word_color(&word.text).to_rgba(),
        ))
    }
}

/// Spell the table back out as text, each word repeated `count` times, so
/// the engine's own tokenizer sees exactly these frequencies.
fn frequency_text(rows: &[&WordRow]) -> String {
    let len = rows.iter().map(|r| (r.word.len() + 1) * r.count).sum();
    let mut text = String::with_capacity(len);
    for row in rows {
        for _ in 0..row.count {
            text.push_str(&row.word);
            text.push(' ');
        }
    }
    text
}

fn load_font(path: &Path) -> Result<FontVec, WordCloudError> {
    let bytes = std::fs::read(path).map_err(|e| {
        WordCloudError::InvalidConfig(format!("Cannot read font '{}': {e}", path.display()))
    })?;
    FontVec::try_from_vec(bytes).map_err(|e| {
        WordCloudError::InvalidConfig(format!("'{}' is not a usable font: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::count::WordCount;

    fn opts(width: f32, height: f32) -> LayoutOptions {
        LayoutOptions {
            width,
            height,
            ..LayoutOptions::default()
        }
    }

    fn rows(text: &str) -> Vec<WordRow> {
        WordCount::from_text(text).rows().to_vec()
    }

    fn differs_from(bitmap: &RgbaImage, background: Rgb) -> bool {
        bitmap.pixels().any(|p| *p != background.to_rgba())
    }

    #[test]
    fn empty_or_punctuation_only_is_empty_input() {
        for text in ["", "-- ... ;"] {
            let err = WcloudLayout.draw(&rows(text), &opts(200.0, 100.0), 1.0).unwrap_err();
            assert!(matches!(err, WordCloudError::EmptyInput), "{text:?}");
        }
    }

    #[test]
    fn canvas_below_min_font_has_no_space() {
        let err = WcloudLayout
            .draw(&rows("extraordinarily"), &opts(3.0, 3.0), 1.0)
            .unwrap_err();
        assert!(matches!(err, WordCloudError::NoSpaceToDraw { width: 3, height: 3 }));
    }

    #[test]
    fn draws_on_requested_canvas() {
        let options = opts(300.0, 180.0);
        let bitmap = WcloudLayout
            .draw(&rows("maple maple maple birch birch cedar"), &options, 1.0)
            .unwrap();
        assert_eq!(bitmap.dimensions(), (300, 180));
        assert!(differs_from(&bitmap, options.background));
    }

    #[test]
    fn same_seed_same_picture() {
        let table = rows("one one one two two three four five six");
        let a = WcloudLayout.draw(&table, &opts(240.0, 160.0), 1.0).unwrap();
        let b = WcloudLayout.draw(&table, &opts(240.0, 160.0), 1.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cyrillic_words_are_drawn() {
        let options = opts(240.0, 160.0);
        let bitmap = WcloudLayout
            .draw(&rows("привет привет мир"), &options, 1.0)
            .unwrap();
        assert!(differs_from(&bitmap, options.background));
    }

    #[test]
    fn unreadable_font_is_invalid_config() {
        let options = LayoutOptions {
            font_path: Some("/nonexistent/font.ttf".into()),
            ..opts(240.0, 160.0)
        };
        let err = WcloudLayout.draw(&rows("word"), &options, 1.0).unwrap_err();
        assert!(matches!(err, WordCloudError::InvalidConfig(_)));
    }

    #[test]
    fn frequency_text_repeats_each_word() {
        let table = rows("b a b");
        let refs: Vec<&WordRow> = table.iter().collect();
        assert_eq!(frequency_text(&refs), "b b a ");
    }

    #[test]
    fn resampled_bitmap_matches_dpi() {
        let image = CloudImage {
            width: 720.0,
            height: 432.0,
            background: Rgb::BLACK,
            words: vec![],
            omitted_words: 0,
            bitmap: RgbaImage::from_pixel(720, 432, Rgba([0, 0, 0, 255])),
        };
        assert_eq!(image.bitmap_scale(), 1.0);
        assert_eq!(image.pixel_size(72), (720, 432));
        assert_eq!(image.bitmap_at(50).dimensions(), (500, 300));
        assert_eq!(image.bitmap_at(100).dimensions(), (1000, 600));
    }

    #[test]
    fn word_colour_is_stable() {
        assert_eq!(word_color("river"), word_color("river"));
    }

    #[test]
    fn rgb_parsing_and_hex() {
        assert_eq!(Rgb::from_hex("#ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("0a0B0c"), Some(Rgb::new(10, 11, 12)));
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("Black"), Some(Rgb::BLACK));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert!("purple".parse::<Rgb>().is_err());
        assert_eq!(Rgb::new(1, 2, 255).to_hex(), "#0102ff");
        assert_eq!(serde_json::to_string(&Rgb::WHITE).unwrap(), "\"#ffffff\"");
    }

    #[test]
    fn viridis_endpoints() {
        assert_eq!(viridis(0.0), VIRIDIS[0]);
        assert_eq!(viridis(1.0), VIRIDIS[4]);
        assert_eq!(viridis(0.5), VIRIDIS[2]);
    }
}
