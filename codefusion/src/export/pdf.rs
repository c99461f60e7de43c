//! Single-page PDF embedding a raster snapshot.
//!
//! The page is sized to the image (one point per pixel) and the image is
//! drawn to fill it. Optional text spans are printed over the image with the
//! standard Helvetica fonts, so no font file is embedded.

use crate::error::ExportError;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

/// A line of text printed over the snapshot.
///
/// Positions are in image pixels, measured from the top-left corner to the
/// start of the text baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    /// Distance from the left edge
    pub x: u32,
    /// Distance from the top edge to the baseline
    pub baseline: u32,
    /// Font size in points
    pub size: u32,
    /// Bold face
    pub bold: bool,
    /// The text
    pub text: String,
}

impl TextSpan {
    /// Regular-weight span.
    #[must_use]
    pub fn new(x: u32, baseline: u32, size: u32, text: impl Into<String>) -> Self {
        Self {
            x,
            baseline,
            size,
            bold: false,
            text: text.into(),
        }
    }

    /// Bold-weight span.
    #[must_use]
    pub fn bold(x: u32, baseline: u32, size: u32, text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::new(x, baseline, size, text)
        }
    }
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn font(base: &str) -> Object {
    let mut font = Dictionary::new();
    font.set("Type", name("Font"));
    font.set("Subtype", name("Type1"));
    font.set("BaseFont", name(base));
    font.set("Encoding", name("WinAnsiEncoding"));
    Object::Dictionary(font)
}

/// Latin-1 bytes for the standard fonts; anything outside becomes `?`.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn text_operations(span: &TextSpan, page_height: i64) -> [Operation; 5] {
    let face = if span.bold { "F2" } else { "F1" };
    [
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![name(face), Object::Integer(i64::from(span.size))]),
        Operation::new(
            "Td",
            vec![
                Object::Integer(i64::from(span.x)),
                Object::Integer(page_height - i64::from(span.baseline)),
            ],
        ),
        Operation::new(
            "Tj",
            vec![Object::String(latin1(&span.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Build a PDF document containing `image` as its only page, with `spans`
/// printed over it in white.
///
/// # Errors
///
/// Returns [`ExportError::Pdf`] if the page content cannot be encoded or the
/// document cannot be written.
pub fn build_pdf(image: &RgbImage, title: &str, spans: &[TextSpan]) -> Result<Vec<u8>, ExportError> {
    let (width, height) = image.dimensions();
    let (width, height) = (i64::from(width), i64::from(height));

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut image_dict = Dictionary::new();
    image_dict.set("Type", name("XObject"));
    image_dict.set("Subtype", name("Image"));
    image_dict.set("Width", Object::Integer(width));
    image_dict.set("Height", Object::Integer(height));
    image_dict.set("ColorSpace", name("DeviceRGB"));
    image_dict.set("BitsPerComponent", Object::Integer(8));
    let image_id = doc.add_object(Stream::new(image_dict, image.as_raw().clone()));

    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Integer(width),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(height),
                Object::Integer(0),
                Object::Integer(0),
            ],
        ),
        Operation::new("Do", vec![name("Im0")]),
        Operation::new("Q", vec![]),
    ];
    if !spans.is_empty() {
        operations.push(Operation::new(
            "rg",
            vec![Object::Integer(1), Object::Integer(1), Object::Integer(1)],
        ));
        operations.extend(spans.iter().flat_map(|span| text_operations(span, height)));
    }
    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(image_id));
    let mut fonts = Dictionary::new();
    fonts.set("F1", font("Helvetica"));
    fonts.set("F2", font("Helvetica-Bold"));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));
    resources.set("Font", Object::Dictionary(fonts));

    let mut page = Dictionary::new();
    page.set("Type", name("Page"));
    page.set("Parent", Object::Reference(pages_id));
    page.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(width),
            Object::Integer(height),
        ]),
    );
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Reference(content_id));
    let page_id = doc.add_object(page);

    let mut pages = Dictionary::new();
    pages.set("Type", name("Pages"));
    pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages.set("Count", Object::Integer(1));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", name("Catalog"));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);

    let mut info = Dictionary::new();
    info.set("Title", Object::string_literal(title));
    info.set("Producer", Object::string_literal("CodeFusion 2025"));
    let info_id = doc.add_object(info);

    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use image::Rgb;

    #[test]
    fn page_is_sized_to_the_image() {
        let image = RgbImage::from_pixel(300, 170, Rgb([1, 2, 3]));
        let bytes = build_pdf(&image, "Ticket DEV-0001", &[]).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_i64().unwrap(), 300);
        assert_eq!(media_box[3].as_i64().unwrap(), 170);
    }

    #[test]
    fn spans_are_printed_as_text() {
        let image = RgbImage::from_pixel(600, 340, Rgb([0, 0, 0]));
        let spans = [
            TextSpan::bold(160, 120, 20, "Ada Lovelace"),
            TextSpan::new(160, 145, 12, "Zoë (Engineer)"),
        ];
        let bytes = build_pdf(&image, "Ticket DEV-0001", &spans).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let texts: Vec<Vec<u8>> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .map(|op| op.operands[0].as_str().unwrap().to_vec())
            .collect();
        assert_eq!(texts, vec![b"Ada Lovelace".to_vec(), b"Zo\xeb (Engineer)".to_vec()]);

        let offsets: Vec<i64> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Td")
            .map(|op| op.operands[1].as_i64().unwrap())
            .collect();
        assert_eq!(offsets, vec![220, 195]);
    }
}
