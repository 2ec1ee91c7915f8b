//! Band planning: how a scaled snapshot is sliced across pages.
//!
//! Planning is pure arithmetic over the snapshot's pixel dimensions and the
//! page geometry. It never touches pixels, so the same plan can drive a real
//! PDF, a dry run, or a test recorder.

use serde::Serialize;
use tracing::{debug, instrument, trace};

use super::geometry::{PageGeometry, ScaleMode, ScaledImage};
use super::writer::{PageText, Placement};
use crate::error::{Result, WssError};
use crate::raster::TextRun;

/// Heights within this distance (mm) of a page boundary are treated as exact.
pub const SLACK_MM: f64 = 1e-6;

/// One horizontal slice of the scaled snapshot, mapped to one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageBand {
    /// Zero-based page this band is drawn on.
    pub page_index: usize,
    /// Offset of the band's top edge in scaled space (mm).
    pub offset: f64,
    /// Band height in scaled space (mm).
    pub height: f64,
    /// First source pixel row.
    pub source_y: u32,
    /// Number of source pixel rows.
    pub source_height: u32,
}

/// Full slicing plan for one export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlan {
    pub geometry: PageGeometry,
    pub scale_mode: ScaleMode,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub image: ScaledImage,
    pub bands: Vec<PageBand>,
}

impl PagePlan {
    /// Plan the bands for a `pixel_width` x `pixel_height` snapshot.
    #[instrument(skip(geometry), fields(mode = ?scale_mode))]
    pub fn new(
        pixel_width: u32,
        pixel_height: u32,
        geometry: PageGeometry,
        scale_mode: ScaleMode,
    ) -> Result<Self> {
        if pixel_width == 0 {
            return Err(WssError::invalid("snapshot.width", "must be greater than 0"));
        }
        if pixel_height == 0 {
            return Err(WssError::invalid("snapshot.height", "must be greater than 0"));
        }
        geometry.validate()?;

        let image = ScaledImage::fit(pixel_width, pixel_height, &geometry, scale_mode);
        let content_height = geometry.content_height();
        let scale = f64::from(pixel_height) / image.height;

        let mut bands = Vec::new();
        let mut remaining = image.height;
        let mut cursor = 0.0;
        let mut page_index = 0;

        // At least one band, even for a sub-slack image height.
        loop {
            let last = remaining - content_height <= SLACK_MM;
            let height = if last { remaining } else { content_height };
            let (source_y, source_height) =
                source_rows(cursor, height, scale, pixel_height, last);

            trace!(page_index, cursor, height, source_y, source_height, "Planned band");
            bands.push(PageBand {
                page_index,
                offset: cursor,
                height,
                source_y,
                source_height,
            });

            remaining -= height;
            cursor += height;
            page_index += 1;

            if last || remaining <= SLACK_MM {
                break;
            }
        }

        debug!(
            pages = bands.len(),
            img_width = image.width,
            img_height = image.height,
            "Band plan ready"
        );

        Ok(Self {
            geometry,
            scale_mode,
            pixel_width,
            pixel_height,
            image,
            bands,
        })
    }

    pub fn page_count(&self) -> usize {
        self.bands.len()
    }

    /// Where a band is drawn on its page.
    pub fn placement(&self, band: &PageBand) -> Placement {
        Placement {
            x: self.geometry.margin,
            y: self.geometry.margin,
            width: self.image.width,
            height: band.height,
        }
    }

    /// Index of the band that draws source row `y`.
    ///
    /// Rows past the end belong to the last band, so every row maps to
    /// exactly one page.
    pub fn band_for_row(&self, y: f64) -> usize {
        self.bands
            .iter()
            .rposition(|band| f64::from(band.source_y) <= y)
            .unwrap_or(0)
    }

    /// Where a text run is written on the page of `band`.
    ///
    /// Horizontal lengths scale with the image width, vertical offsets with
    /// the band, matching how the band's pixels are stretched.
    pub fn text_placement(&self, band: &PageBand, run: &TextRun) -> PageText {
        let x_scale = self.image.width / f64::from(self.pixel_width);
        let y_scale = band.height / f64::from(band.source_height);
        PageText {
            x: self.geometry.margin + run.x * x_scale,
            baseline: self.geometry.margin + (run.baseline - f64::from(band.source_y)) * y_scale,
            size: run.size * x_scale,
            color: run.color,
            weight: run.weight,
            text: run.text.clone(),
        }
    }

    /// Sum of all band heights in scaled space.
    pub fn covered_height(&self) -> f64 {
        self.bands.iter().map(|b| b.height).sum()
    }
}

/// Round half up, the single rounding rule for band boundaries.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Map a scaled-space band to source pixel rows.
///
/// Boundaries are rounded from the cumulative cursor, so neighbouring bands
/// share an edge. The last band always ends on the final row.
fn source_rows(cursor: f64, height: f64, scale: f64, pixel_height: u32, last: bool) -> (u32, u32) {
    let max = f64::from(pixel_height);
    let start = round_half_up(cursor * scale).clamp(0.0, max) as u32;
    let end = if last {
        pixel_height
    } else {
        round_half_up((cursor + height) * scale).clamp(0.0, max) as u32
    };

    if end > start {
        return (start, end - start);
    }

    // Sub-pixel band: keep one row inside the snapshot.
    let start = start.min(pixel_height - 1);
    (start, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4() -> PageGeometry {
        PageGeometry::a4()
    }

    #[test]
    fn test_tall_snapshot_fit_page_is_one_page() {
        let plan = PagePlan::new(1000, 3000, a4(), ScaleMode::FitPage).unwrap();
        assert_eq!(plan.page_count(), 1);
        assert!((plan.image.height - 257.0).abs() < 1e-9);
        assert!((plan.image.width - 85.67).abs() < 0.01);
        assert_eq!(plan.bands[0].source_y, 0);
        assert_eq!(plan.bands[0].source_height, 3000);
    }

    #[test]
    fn test_fit_width_slices_two_pages() {
        // 170mm wide, 510mm tall: 257 + 253
        let plan = PagePlan::new(1000, 3000, a4(), ScaleMode::FitWidth).unwrap();
        assert_eq!(plan.page_count(), 2);
        assert!((plan.bands[0].height - 257.0).abs() < 1e-9);
        assert!((plan.bands[1].height - 253.0).abs() < 1e-9);

        let first = plan.bands[0];
        let second = plan.bands[1];
        assert_eq!(first.source_y, 0);
        assert_eq!(first.source_y + first.source_height, second.source_y);
        assert_eq!(second.source_y + second.source_height, 3000);
    }

    #[test]
    fn test_exact_three_pages() {
        // 170 wide, 771 tall in mm at 1px = 1mm
        let plan = PagePlan::new(170, 771, a4(), ScaleMode::FitWidth).unwrap();
        assert_eq!(plan.page_count(), 3);
        for band in &plan.bands {
            assert!((band.height - 257.0).abs() < 1e-6);
            assert_eq!(band.source_height, 257);
        }
    }

    #[test]
    fn test_bands_cover_full_height() {
        for (w, h) in [(800, 5000), (1285, 9999), (333, 12_345), (50, 50)] {
            let plan = PagePlan::new(w, h, a4(), ScaleMode::FitWidth).unwrap();
            assert!((plan.covered_height() - plan.image.height).abs() < 1e-6);

            let expected = (plan.image.height / a4().content_height()).ceil() as usize;
            assert_eq!(plan.page_count(), expected, "{w}x{h}");

            let rows: u32 = plan.bands.iter().map(|b| b.source_height).sum();
            assert_eq!(rows, h);
        }
    }

    #[test]
    fn test_placement_at_margins() {
        let plan = PagePlan::new(1000, 3000, a4(), ScaleMode::FitWidth).unwrap();
        let p = plan.placement(&plan.bands[1]);
        assert!((p.x - 20.0).abs() < 1e-9);
        assert!((p.y - 20.0).abs() < 1e-9);
        assert!((p.width - 170.0).abs() < 1e-9);
        assert!((p.height - 253.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_dimension_snapshot_rejected() {
        let err = PagePlan::new(0, 10, a4(), ScaleMode::FitPage).unwrap_err();
        assert!(matches!(err, WssError::InvalidInput { field: "snapshot.width", .. }));
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let geometry = PageGeometry::new(210.0, 297.0, 0.0);
        let err = PagePlan::new(10, 10, geometry, ScaleMode::FitPage).unwrap_err();
        assert!(matches!(err, WssError::InvalidInput { field: "geometry.margin", .. }));
    }

    #[test]
    fn test_source_rows_never_empty() {
        assert_eq!(source_rows(0.0, 0.0001, 1.0, 10, false), (0, 1));
        assert_eq!(source_rows(10.0, 0.1, 1.0, 10, false), (9, 1));
        assert_eq!(source_rows(2.4, 3.0, 1.0, 10, true), (2, 8));
    }

    #[test]
    fn test_round_half_up() {
        assert!((round_half_up(2.5) - 3.0).abs() < f64::EPSILON);
        assert!((round_half_up(2.4999) - 2.0).abs() < f64::EPSILON);
    }
}
