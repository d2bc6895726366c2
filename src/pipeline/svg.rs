//! SVG export.
//!
//! The document keeps the canvas coordinate system (points) in its
//! `viewBox`; `width` and `height` are the canvas size in inches times the
//! requested DPI. The drawing itself is the cloud bitmap at that DPI,
//! embedded as a PNG data URI. The words are listed in `<desc>` so the file
//! stays searchable.

use crate::config::{ExportFormat, POINTS_PER_INCH};
use crate::error::WordCloudError;
use crate::pipeline::encode;
use crate::pipeline::layout::CloudImage;
use image::DynamicImage;
use std::fmt::Write as _;

/// Render `image` as a standalone SVG document.
pub fn write_svg(image: &CloudImage, dpi: u32) -> Result<String, WordCloudError> {
    let scale = dpi as f32 / POINTS_PER_INCH;
    let png = encode::encode_raster(
        &DynamicImage::ImageRgba8(image.bitmap_at(dpi)),
        ExportFormat::Png,
    )?;
    let href = encode::data_uri(ExportFormat::Png.mime_type(), &png);
    let words: Vec<&str> = image.words.iter().map(|r| r.word.as_str()).collect();

    let mut svg = String::with_capacity(512 + href.len());
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    // write! into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="0 0 {w} {h}">"#,
        fmt_num(image.width * scale),
        fmt_num(image.height * scale),
        w = fmt_num(image.width),
        h = fmt_num(image.height),
    );
    svg.push_str("<title>Word cloud</title>\n");
    let _ = writeln!(svg, "<desc>{}</desc>", escape_xml(&words.join(" ")));
    let _ = writeln!(
        svg,
        r#"<image x="0" y="0" width="{}" height="{}" preserveAspectRatio="none" xlink:href="{href}"/>"#,
        fmt_num(image.width),
        fmt_num(image.height),
    );
    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Format with at most two decimals, trimming trailing zeros.
pub(crate) fn fmt_num(v: f32) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape markup characters and drop code points XML 1.0 does not allow
/// (C0 controls other than tab, newline and carriage return, U+FFFE, U+FFFF).
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {}
            _ => out.push(c),
        }
    }
    out
}
