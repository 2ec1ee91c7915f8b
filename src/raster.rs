//! Raster snapshots handed to the exporter.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage, RgbaImage, imageops};
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::{Result, ResultExt, WssError};
use crate::palette::HexColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// A line of text laid over the snapshot, in snapshot pixels.
///
/// Text is kept out of the bitmap so the exporter can write it as real PDF
/// text that stays sharp and selectable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    /// Left edge of the first glyph.
    pub x: f64,
    /// Baseline, measured from the top of the snapshot.
    pub baseline: f64,
    /// Font size (em height).
    pub size: f64,
    pub color: HexColor,
    pub weight: FontWeight,
    pub text: String,
}

/// An immutable bitmap capture of the printable palette layout.
#[derive(Debug, Clone)]
pub struct Snapshot {
    image: RgbaImage,
    text: Vec<TextRun>,
}

impl Snapshot {
    /// Wrap an RGBA buffer, rejecting empty rasters.
    pub fn new(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 {
            return Err(WssError::invalid("snapshot.width", "must be greater than 0"));
        }
        if height == 0 {
            return Err(WssError::invalid("snapshot.height", "must be greater than 0"));
        }
        Ok(Self { image, text: Vec::new() })
    }

    /// Attach text drawn on top of the bitmap.
    pub fn with_text(mut self, text: Vec<TextRun>) -> Self {
        self.text = text;
        self
    }

    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        Self::new(image.to_rgba8())
    }

    /// Load a pre-rendered snapshot from disk.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WssError::ImageNotFound {
                path: path.display().to_string(),
            });
        }
        let img = image::open(path).map_err(|e| WssError::ImageProcessing(e.to_string()))?;
        debug!(width = img.width(), height = img.height(), "Loaded snapshot");
        Self::from_dynamic(img)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    /// Text overlay; empty for snapshots loaded from image files.
    pub fn text(&self) -> &[TextRun] {
        &self.text
    }

    /// Copy rows `[source_y, source_y + source_height)` at full width,
    /// flattened onto white.
    ///
    /// Out-of-range rows are clamped to the snapshot; the band always holds
    /// at least one row.
    pub fn extract_band(&self, source_y: u32, source_height: u32) -> RgbImage {
        let height = self.height();
        let start = source_y.min(height - 1);
        let end = source_y.saturating_add(source_height).clamp(start + 1, height);
        if start != source_y || end - start != source_height {
            debug!(
                source_y,
                source_height,
                clamped_y = start,
                clamped_height = end - start,
                "Clamped band to snapshot bounds"
            );
        }

        let band = imageops::crop_imm(&self.image, 0, start, self.width(), end - start).to_image();
        trace!(rows = end - start, "Extracted band");
        flatten_on_white(&band)
    }

    /// Save the snapshot as an image file (format from the extension).
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image
            .save(path)
            .with_context(|| format!("Saving snapshot to {}", path.display()))
    }
}

/// Composite an RGBA raster over an opaque white background.
pub fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}
