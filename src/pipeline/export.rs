//! Export: [`CloudImage`] → bytes of a PNG, JPG, SVG or PDF file.
//!
//! Every format carries the cloud bitmap resampled to the requested DPI.
//!
//! | Format | Container | DPI sets |
//! |--------|-----------|----------|
//! | PNG, JPG | `image` encoder | pixel size |
//! | SVG | XML with an embedded PNG | `width`/`height` and bitmap size |
//! | PDF | `lopdf` page of the canvas size | bitmap size only |

use crate::config::{validate_dpi, ExportFormat};
use crate::error::WordCloudError;
use crate::pipeline::layout::CloudImage;
use crate::pipeline::{encode, pdfgen, svg};
use image::DynamicImage;
use serde::Serialize;
use tracing::info;

/// An exported cloud, ready to save or embed.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    /// Always `wordcloud.<ext>`.
    pub file_name: String,
    pub mime_type: &'static str,
    pub format: ExportFormat,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format.file_name(),
            mime_type: format.mime_type(),
            format,
            bytes,
        }
    }

    pub fn data_uri(&self) -> String {
        encode::data_uri(self.mime_type, &self.bytes)
    }

    /// `<a href="data:..." download="wordcloud.<ext>">`.
    pub fn download_link(&self) -> String {
        encode::download_link(&self.file_name, self.mime_type, &self.bytes)
    }
}

/// Encode `image` in `format` at `dpi` (50–300).
pub fn export(
    image: &CloudImage,
    format: ExportFormat,
    dpi: u32,
) -> Result<ExportedFile, WordCloudError> {
    let dpi = validate_dpi(dpi)?;

    let bytes = match format {
        ExportFormat::Pdf => pdfgen::write_pdf(image, dpi)?,
        ExportFormat::Svg => svg::write_svg(image, dpi)?.into_bytes(),
        ExportFormat::Png | ExportFormat::Jpg => {
            encode::encode_raster(&DynamicImage::ImageRgba8(image.bitmap_at(dpi)), format)?
        }
    };

    info!("Exported {} ({} bytes)", format.file_name(), bytes.len());
    Ok(ExportedFile::new(format, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutOptions;
    use crate::pipeline::render;

    fn cloud() -> CloudImage {
        render::render(
            "maple maple maple birch birch cedar",
            &LayoutOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn dpi_out_of_range_is_rejected() {
        let image = cloud();
        for dpi in [49, 301] {
            for format in ExportFormat::ALL {
                let err = export(&image, format, dpi).unwrap_err();
                assert!(matches!(err, WordCloudError::InvalidConfig(_)));
            }
        }
    }

    #[test]
    fn svg_lists_every_word() {
        let image = cloud();
        let file = export(&image, ExportFormat::Svg, 100).unwrap();
        assert_eq!(file.file_name, "wordcloud.svg");
        assert_eq!(file.mime_type, "image/svg+xml");
        let svg = String::from_utf8(file.bytes).unwrap();
        for row in &image.words {
            assert!(svg.contains(&row.word), "{}", row.word);
        }
    }

    #[test]
    fn raster_size_follows_dpi() {
        let image = cloud();
        let png = export(&image, ExportFormat::Png, 100).unwrap();
        assert!(png.bytes.starts_with(b"\x89PNG"));
        let decoded = image::load_from_memory(&png.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1000, 600));

        let jpg = export(&image, ExportFormat::Jpg, 50).unwrap();
        assert_eq!(jpg.mime_type, "image/jpeg");
        let decoded = image::load_from_memory(&jpg.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (500, 300));
    }

    #[test]
    fn link_uses_format_mime() {
        let file = export(&cloud(), ExportFormat::Pdf, 100).unwrap();
        let link = file.download_link();
        assert!(link.contains("data:application/pdf;base64,"));
        assert!(link.contains(r#"download="wordcloud.pdf""#));
    }
}
