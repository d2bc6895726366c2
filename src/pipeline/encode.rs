//! Encoding: bitmaps → PNG/JPEG bytes, and bytes → base64 download links.
//!
//! A data URI lets a host page offer the export without a second request or
//! a temporary file on a server. The anchor's `download` attribute carries
//! the fixed `wordcloud.<ext>` name so the browser saves it under that name.

use crate::config::ExportFormat;
use crate::error::WordCloudError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Encode a bitmap as PNG or JPEG. JPEG has no alpha channel, so the image
/// is flattened to RGB first.
pub fn encode_raster(img: &DynamicImage, format: ExportFormat) -> Result<Vec<u8>, WordCloudError> {
    let failed = |e: image::ImageError| WordCloudError::ExportFailed {
        format: format.to_string(),
        detail: e.to_string(),
    };

    let mut buf = Vec::new();
    match format {
        ExportFormat::Png => img
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(failed)?,
        ExportFormat::Jpg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
            .map_err(failed)?,
        ExportFormat::Svg | ExportFormat::Pdf => {
            return Err(WordCloudError::Internal(format!(
                "{format} is not a raster format"
            )))
        }
    }
    debug!("Encoded {}x{} bitmap → {} bytes {format}", img.width(), img.height(), buf.len());
    Ok(buf)
}

/// `data:<mime>;base64,<payload>`.
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded {} bytes → {} bytes base64", bytes.len(), b64.len());
    format!("data:{mime_type};base64,{b64}")
}

/// An HTML anchor that downloads `bytes` as `file_name`.
pub fn download_link(file_name: &str, mime_type: &str, bytes: &[u8]) -> String {
    format!(
        r#"<a href="{}" download="{file_name}">Download {file_name}</a>"#,
        data_uri(mime_type, bytes)
    )
}
