//! PDF export: a single page written with `lopdf`.
//!
//! The page is the canvas size in points whatever the DPI; the DPI sets the
//! resolution of the cloud bitmap drawn across it. The bitmap is stored as
//! an RGB image XObject and Flate-compressed with the rest of the file.

use crate::error::WordCloudError;
use crate::pipeline::layout::CloudImage;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tracing::debug;

const IMAGE_RESOURCE: &str = "Im1";

fn export_failed(detail: impl std::fmt::Display) -> WordCloudError {
    WordCloudError::ExportFailed {
        format: "pdf".to_string(),
        detail: detail.to_string(),
    }
}

/// Serialise `image` as a one-page PDF with its bitmap at `dpi`.
pub fn write_pdf(image: &CloudImage, dpi: u32) -> Result<Vec<u8>, WordCloudError> {
    let bitmap = DynamicImage::ImageRgba8(image.bitmap_at(dpi)).into_rgb8();
    let (px_w, px_h) = bitmap.dimensions();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => px_w as i64,
            "Height" => px_h as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        bitmap.into_raw(),
    ));
    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            IMAGE_RESOURCE => image_id,
        },
    });

    let content = Content {
        operations: page_operations(image.width, image.height),
    };
    let encoded = content.encode().map_err(export_failed)?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "MediaBox" => vec![0.into(), 0.into(), image.width.into(), image.height.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let words: Vec<&str> = image.words.iter().map(|r| r.word.as_str()).collect();
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Word cloud"),
        "Keywords" => text_string(&words.join(" ")),
        "Producer" => Object::string_literal(concat!("doc-wordcloud ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(export_failed)?;
    debug!("PDF export: {px_w}x{px_h} px bitmap, {} bytes", bytes.len());
    Ok(bytes)
}

/// A PDF text string: plain bytes for ASCII, UTF-16BE with a byte order
/// mark otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Scale the unit square to the page and paint the bitmap into it.
fn page_operations(width: f32, height: f32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                0.into(),
                0.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::count::WordRow;
    use crate::pipeline::layout::Rgb;
    use image::{Rgba, RgbaImage};

    fn sample() -> CloudImage {
        CloudImage {
            width: 360.0,
            height: 216.0,
            background: Rgb::BLACK,
            words: vec![WordRow {
                word: "harbour".into(),
                count: 2,
            }],
            omitted_words: 0,
            bitmap: RgbaImage::from_pixel(360, 216, Rgba([10, 20, 30, 255])),
        }
    }

    fn find_typed<'a>(doc: &'a Document, key: &[u8], value: &[u8]) -> &'a lopdf::Dictionary {
        doc.objects
            .values()
            .filter_map(|o| match o {
                Object::Dictionary(d) => Some(d),
                Object::Stream(s) => Some(&s.dict),
                _ => None,
            })
            .find(|d| d.get(key).and_then(Object::as_name).map_or(false, |n| n == value))
            .unwrap()
    }

    #[test]
    fn output_reopens_with_one_page() {
        let bytes = write_pdf(&sample(), 100).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn page_size_ignores_dpi_but_bitmap_follows_it() {
        for (dpi, px) in [(50, 250), (144, 720)] {
            let doc = Document::load_mem(&write_pdf(&sample(), dpi).unwrap()).unwrap();
            let pages = find_typed(&doc, b"Type", b"Pages");
            let media = pages.get(b"MediaBox").unwrap().as_array().unwrap();
            assert_eq!(media[2].as_float().unwrap(), 360.0);

            let xobject = find_typed(&doc, b"Subtype", b"Image");
            assert_eq!(xobject.get(b"Width").unwrap().as_i64().unwrap(), px);
        }
    }

    #[test]
    fn paints_bitmap_over_whole_page() {
        let ops = page_operations(360.0, 216.0);
        let cm = ops.iter().find(|op| op.operator == "cm").unwrap();
        assert_eq!(cm.operands[0].as_float().unwrap(), 360.0);
        assert_eq!(cm.operands[3].as_float().unwrap(), 216.0);
        assert!(ops.iter().any(|op| op.operator == "Do"));
    }

    #[test]
    fn non_ascii_keywords_survive() {
        let mut image = sample();
        image.words = vec![
            WordRow { word: "привет".into(), count: 2 },
            WordRow { word: "мир".into(), count: 1 },
        ];
        let doc = Document::load_mem(&write_pdf(&image, 50).unwrap()).unwrap();
        let info = doc
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .unwrap();
        let raw = info.get(b"Keywords").and_then(Object::as_str).unwrap();
        assert_eq!(&raw[..2], &[0xFE, 0xFF]);
        let units: Vec<u16> = raw[2..]
            .chunks(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(String::from_utf16(&units).unwrap(), "привет мир");
    }

    #[test]
    fn ascii_text_stays_literal() {
        assert_eq!(text_string("harbour"), Object::string_literal("harbour"));
    }
}
