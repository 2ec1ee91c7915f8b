//! Recording document writer for unit testing.
//!
//! Records every writer call so tests can assert on the exact sequence of
//! pages and placements without decoding a PDF.
//!
//! # Example
//!
//! ```rust,ignore
//! use wss::export::mock::{RecordingWriter, WriterOp};
//!
//! let mut writer = RecordingWriter::new();
//! exporter.export(&snapshot, &mut writer)?;
//! assert_eq!(writer.page_count(), 2);
//! ```

use image::RgbImage;
use tracing::trace;

use super::writer::{DocumentWriter, PageText, Placement};
use crate::error::{Result, WssError};

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum WriterOp {
    AddPage,
    PlaceImage {
        page: usize,
        pixel_width: u32,
        pixel_height: u32,
        placement: Placement,
    },
    PlaceText {
        page: usize,
        text: PageText,
    },
}

/// Writer that records operations instead of producing a document.
#[derive(Debug)]
pub struct RecordingWriter {
    ops: Vec<WriterOp>,
    pages: usize,
    fail_on_place: Option<String>,
}

impl Default for RecordingWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            pages: 1,
            fail_on_place: None,
        }
    }

    /// Make every `place_image` call fail with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_on_place: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn operations(&self) -> &[WriterOp] {
        &self.ops
    }

    /// Placements in call order.
    pub fn placements(&self) -> Vec<(usize, Placement)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                WriterOp::PlaceImage { page, placement, .. } => Some((*page, *placement)),
                _ => None,
            })
            .collect()
    }

    /// Pixel heights of the placed bands in call order.
    pub fn band_heights(&self) -> Vec<u32> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                WriterOp::PlaceImage { pixel_height, .. } => Some(*pixel_height),
                _ => None,
            })
            .collect()
    }

    /// Written text with its page, in call order.
    pub fn texts(&self) -> Vec<(usize, String)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                WriterOp::PlaceText { page, text } => Some((*page, text.text.clone())),
                _ => None,
            })
            .collect()
    }
}

impl DocumentWriter for RecordingWriter {
    fn add_page(&mut self) -> Result<()> {
        trace!(pages = self.pages + 1, "Recording add_page");
        self.pages += 1;
        self.ops.push(WriterOp::AddPage);
        Ok(())
    }

    fn place_image(&mut self, band: &RgbImage, placement: Placement) -> Result<()> {
        if let Some(message) = &self.fail_on_place {
            return Err(WssError::Document(message.clone()));
        }
        trace!(page = self.pages - 1, "Recording place_image");
        self.ops.push(WriterOp::PlaceImage {
            page: self.pages - 1,
            pixel_width: band.width(),
            pixel_height: band.height(),
            placement,
        });
        Ok(())
    }

    fn place_text(&mut self, text: &PageText) -> Result<()> {
        trace!(page = self.pages - 1, "Recording place_text");
        self.ops.push(WriterOp::PlaceText {
            page: self.pages - 1,
            text: text.clone(),
        });
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages
    }
}
