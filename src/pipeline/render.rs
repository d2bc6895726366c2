//! Cloud rendering: filtered text → [`CloudImage`].
//!
//! Rendering counts the text, keeps the `max_words` most frequent rows and
//! hands them to a [`CloudLayout`]. The bitmap is drawn once, at the highest
//! export resolution the canvas allows, and resampled down by the exporters;
//! see [`crate::pipeline::export`].

use crate::config::{LayoutOptions, MAX_DPI, POINTS_PER_INCH};
use crate::error::WordCloudError;
use crate::pipeline::count::{WordCount, WordRow};
use crate::pipeline::layout::{CloudImage, CloudLayout, WcloudLayout};
use tracing::debug;

/// Longest side of a rendered bitmap, in pixels.
pub const MAX_BITMAP_SIDE: f32 = 4096.0;

/// Lay out `text` with the default [`WcloudLayout`].
pub fn render(text: &str, options: &LayoutOptions) -> Result<CloudImage, WordCloudError> {
    render_with(&WcloudLayout, text, options)
}

/// Lay out `text` with a caller-supplied engine.
pub fn render_with(
    layout: &dyn CloudLayout,
    text: &str,
    options: &LayoutOptions,
) -> Result<CloudImage, WordCloudError> {
    render_counts(layout, &WordCount::from_text(text), options)
}

/// Lay out an already computed word table.
pub fn render_counts(
    layout: &dyn CloudLayout,
    counts: &WordCount,
    options: &LayoutOptions,
) -> Result<CloudImage, WordCloudError> {
    options.validate()?;
    if counts.is_empty() {
        return Err(WordCloudError::EmptyInput);
    }
    let rows: Vec<WordRow> = counts
        .top(options.max_words)
        .into_iter()
        .map(|(word, count)| WordRow { word, count })
        .collect();
    let scale = bitmap_scale(options);
    debug!(
        "Rendering {} of {} distinct words at {scale:.2} px/pt",
        rows.len(),
        counts.len()
    );

    let bitmap = layout.draw(&rows, options, scale)?;
    let background = options.background.to_rgba();
    if bitmap.pixels().all(|p| *p == background) {
        return Err(WordCloudError::NoSpaceToDraw {
            width: options.width.round() as u32,
            height: options.height.round() as u32,
        });
    }

    Ok(CloudImage {
        width: options.width,
        height: options.height,
        background: options.background,
        omitted_words: counts.len() - rows.len(),
        words: rows,
        bitmap,
    })
}

/// Pixels per point for the master bitmap: enough for a [`MAX_DPI`] export,
/// capped at [`MAX_BITMAP_SIDE`].
fn bitmap_scale(options: &LayoutOptions) -> f32 {
    let full = MAX_DPI as f32 / POINTS_PER_INCH;
    full.min(MAX_BITMAP_SIDE / options.width.max(options.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::layout::Rgb;
    use image::{Rgba, RgbaImage};

    struct Capture;

    impl CloudLayout for Capture {
        fn draw(
            &self,
            rows: &[WordRow],
            options: &LayoutOptions,
            scale: f32,
        ) -> Result<RgbaImage, WordCloudError> {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].word, "b");
            assert_eq!(rows[1].word, "a");
            let (w, h) = (options.width * scale, options.height * scale);
            Ok(RgbaImage::from_pixel(w as u32, h as u32, Rgba([255, 255, 255, 255])))
        }
    }

    /// Draws nothing at all.
    struct Blank;

    impl CloudLayout for Blank {
        fn draw(
            &self,
            _rows: &[WordRow],
            options: &LayoutOptions,
            _scale: f32,
        ) -> Result<RgbaImage, WordCloudError> {
            Ok(RgbaImage::from_pixel(8, 8, options.background.to_rgba()))
        }
    }

    #[test]
    fn empty_text_fails_with_empty_input() {
        for text in ["", "   \n\t  "] {
            let err = render(text, &LayoutOptions::default()).unwrap_err();
            assert!(matches!(err, WordCloudError::EmptyInput));
        }
    }

    #[test]
    fn engine_receives_top_rows_only() {
        let options = LayoutOptions {
            max_words: 2,
            ..LayoutOptions::default()
        };
        let image = render_with(&Capture, "a b b c b a", &options).unwrap();
        assert_eq!(image.words.len(), 2);
        assert_eq!(image.omitted_words, 1);
    }

    #[test]
    fn blank_bitmap_means_no_space() {
        let err = render_with(&Blank, "word", &LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, WordCloudError::NoSpaceToDraw { width: 720, height: 432 }));
    }

    #[test]
    fn invalid_options_are_rejected_before_drawing() {
        let options = LayoutOptions {
            font_step: 0.0,
            ..LayoutOptions::default()
        };
        let err = render_with(&Capture, "a b", &options).unwrap_err();
        assert!(matches!(err, WordCloudError::InvalidConfig(_)));
    }

    #[test]
    fn master_bitmap_is_sized_for_max_dpi() {
        assert!((bitmap_scale(&LayoutOptions::default()) - 300.0 / 72.0).abs() < 1e-4);
        let large = LayoutOptions {
            width: 1440.0,
            height: 1440.0,
            ..LayoutOptions::default()
        };
        assert!(1440.0 * bitmap_scale(&large) <= MAX_BITMAP_SIDE);
    }

    #[test]
    fn many_equal_counts_all_reach_the_engine() {
        let text: String = (0..300).map(|i| format!("w{i} w{i} ")).collect();
        let image = render(&text, &LayoutOptions::default()).unwrap();
        assert_eq!(image.words.len(), 200);
        assert_eq!(image.omitted_words, 100);
        assert_eq!(image.background, Rgb::BLACK);
        assert!(image.bitmap.width() >= 2999);
    }

    #[test]
    fn default_canvas_renders_text() {
        let image = render("river river river stone stone moss", &LayoutOptions::default())
            .unwrap();
        assert_eq!(image.width, 720.0);
        assert_eq!(image.words.len(), 3);
        assert_eq!(image.words[0].word, "river");
        assert_eq!(image.words[0].count, 3);
    }
}
