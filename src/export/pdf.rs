//! PDF document writer built on `lopdf`.
//!
//! Each placed band is JPEG-encoded and embedded as a `DCTDecode` image
//! XObject. Text is written with the standard Helvetica faces on top of the
//! images. Page objects are assembled when the document is finished, so
//! pages can be appended freely while exporting.

use std::path::Path;

use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::{debug, info, instrument, trace};

use super::fonts::{StandardFont, encode_win_ansi, text_string};
use super::geometry::PageGeometry;
use super::writer::{DocumentWriter, PageText, Placement};
use crate::error::{Result, WssError};

/// Default document title.
pub const DEFAULT_TITLE: &str = "Worship Service Styles";

/// Default JPEG quality for embedded bands.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Convert millimetres to PDF points.
pub fn mm_to_pt(mm: f64) -> f32 {
    (mm * 72.0 / 25.4) as f32
}

/// Document Info dictionary contents.
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    pub title: String,
    pub subject: Option<String>,
    pub creator: String,
    pub created_at: DateTime<Utc>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subject: None,
            creator: format!("wss {}", env!("CARGO_PKG_VERSION")),
            created_at: Utc::now(),
        }
    }
}

impl DocumentMetadata {
    /// Set the subject line, ignoring blank text.
    pub fn with_subject(mut self, subject: &str) -> Self {
        let trimmed = subject.trim();
        self.subject = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    fn to_dictionary(&self) -> Dictionary {
        let mut dict = dictionary! {
            "Title" => text_string(&self.title),
            "Creator" => text_string(&self.creator),
            "Producer" => Object::string_literal("lopdf"),
            "CreationDate" => Object::string_literal(
                self.created_at.format("D:%Y%m%d%H%M%SZ").to_string()
            ),
        };
        if let Some(subject) = &self.subject {
            dict.set("Subject", text_string(subject));
        }
        dict
    }
}

#[derive(Debug, Default)]
struct PageContent {
    operations: Vec<Operation>,
    images: Dictionary,
}

/// A PDF under construction.
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    geometry: PageGeometry,
    jpeg_quality: u8,
    metadata: DocumentMetadata,
    pages: Vec<PageContent>,
    fonts: Dictionary,
    image_count: usize,
}

impl PdfWriter {
    /// Start a one-page document with the given page size.
    pub fn new(geometry: PageGeometry, jpeg_quality: u8, metadata: DocumentMetadata) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut fonts = Dictionary::new();
        for font in StandardFont::ALL {
            let font_id = doc.add_object(font.dictionary());
            fonts.set(font.resource_name(), font_id);
        }
        debug!(
            page_width = geometry.page_width,
            page_height = geometry.page_height,
            jpeg_quality,
            "Creating PDF document"
        );
        Self {
            doc,
            pages_id,
            geometry,
            jpeg_quality: jpeg_quality.clamp(1, 100),
            metadata,
            pages: vec![PageContent::default()],
            fonts,
            image_count: 0,
        }
    }

    fn encode_jpeg(&self, band: &RgbImage) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buf, self.jpeg_quality);
        DynamicImage::ImageRgb8(band.clone())
            .write_with_encoder(encoder)
            .map_err(|e| WssError::ImageProcessing(format!("JPEG encoding failed: {e}")))?;
        Ok(buf)
    }

    /// Assemble page objects and serialise the document.
    #[instrument(skip(self), fields(pages = self.pages.len()))]
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let media_box: Vec<Object> = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(mm_to_pt(self.geometry.page_width)),
            Object::Real(mm_to_pt(self.geometry.page_height)),
        ];

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in std::mem::take(&mut self.pages) {
            let content = Content {
                operations: page.operations,
            };
            let encoded = content
                .encode()
                .map_err(|e| WssError::Document(format!("Failed to encode page content: {e}")))?;
            let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => page.images,
                    "Font" => self.fonts.clone(),
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => media_box,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let info_id = self.doc.add_object(self.metadata.to_dictionary());
        self.doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| WssError::Document(format!("Failed to serialise PDF: {e}")))?;
        info!(bytes = bytes.len(), pages = count, "PDF assembled");
        Ok(bytes)
    }
}

impl DocumentWriter for PdfWriter {
    fn add_page(&mut self) -> Result<()> {
        self.pages.push(PageContent::default());
        trace!(pages = self.pages.len(), "Added page");
        Ok(())
    }

    fn place_image(&mut self, band: &RgbImage, placement: Placement) -> Result<()> {
        let jpeg = self.encode_jpeg(band)?;
        let jpeg_len = jpeg.len();

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(band.width()),
                "Height" => i64::from(band.height()),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        )
        .with_compression(false);
        let image_id = self.doc.add_object(stream);

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);

        // PDF space starts bottom-left
        let page_height_pt = mm_to_pt(self.geometry.page_height);
        let x = mm_to_pt(placement.x);
        let y = page_height_pt - mm_to_pt(placement.y + placement.height);
        let width = mm_to_pt(placement.width);
        let height = mm_to_pt(placement.height);

        let page = self
            .pages
            .last_mut()
            .ok_or_else(|| WssError::Document("Document has no pages".to_string()))?;
        page.images.set(name.as_bytes().to_vec(), image_id);
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(height),
                    Object::Real(x),
                    Object::Real(y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);

        trace!(
            name = %name,
            jpeg_bytes = jpeg_len,
            pixel_width = band.width(),
            pixel_height = band.height(),
            "Placed image"
        );
        Ok(())
    }

    fn place_text(&mut self, text: &PageText) -> Result<()> {
        let font = StandardFont::for_weight(text.weight);
        let x = mm_to_pt(text.x);
        let y = mm_to_pt(self.geometry.page_height) - mm_to_pt(text.baseline);
        let [r, g, b] = text.color.rgb();
        let channel = |c: u8| Object::Real(f32::from(c) / 255.0);

        let page = self
            .pages
            .last_mut()
            .ok_or_else(|| WssError::Document("Document has no pages".to_string()))?;
        page.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font.resource_name().as_bytes().to_vec()),
                    Object::Real(mm_to_pt(text.size)),
                ],
            ),
            Operation::new("rg", vec![channel(r), channel(g), channel(b)]),
            Operation::new(
                "Tm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    Object::Real(x),
                    Object::Real(y),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(&text.text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);

        trace!(font = font.pdf_name(), chars = text.text.chars().count(), "Placed text");
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Write finished PDF bytes to `path`.
pub fn save_pdf(bytes: &[u8], path: &Path) -> Result<()> {
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "PDF written");
    Ok(())
}
