//! Document writer abstraction.
//!
//! The exporter needs three capabilities from a document: append a page,
//! draw a raster at a position and write a line of text. This trait
//! abstracts over the real PDF writer and the recording writer used in tests.

use image::RgbImage;
use serde::Serialize;

use crate::error::Result;
use crate::palette::HexColor;
use crate::raster::FontWeight;

/// Target rectangle on a page, in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A line of text on a page. Lengths are millimetres from the top-left
/// corner; `baseline` is where the glyphs sit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageText {
    pub x: f64,
    pub baseline: f64,
    pub size: f64,
    pub color: HexColor,
    pub weight: FontWeight,
    pub text: String,
}

/// Core document operations.
///
/// # Implementation Notes
///
/// - A fresh document already holds its first page
/// - `place_image` and `place_text` always draw on the most recently added page
/// - Text placed after an image is drawn over it
pub trait DocumentWriter {
    /// Append a new page and make it current.
    fn add_page(&mut self) -> Result<()>;

    /// Draw `band` on the current page, stretched to `placement`.
    fn place_image(&mut self, band: &RgbImage, placement: Placement) -> Result<()>;

    /// Write `text` on the current page.
    fn place_text(&mut self, text: &PageText) -> Result<()>;

    /// Number of pages in the document so far.
    fn page_count(&self) -> usize;
}
