//! Page geometry and snapshot scaling.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, WssError};

/// A4 portrait width in millimetres.
pub const A4_WIDTH_MM: f64 = 210.0;
/// A4 portrait height in millimetres.
pub const A4_HEIGHT_MM: f64 = 297.0;
/// Default margin (2 cm) in millimetres.
pub const DEFAULT_MARGIN_MM: f64 = 20.0;

/// Physical page size and uniform margin, all in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    /// A4 portrait with 2 cm margins.
    pub const fn a4() -> Self {
        Self {
            page_width: A4_WIDTH_MM,
            page_height: A4_HEIGHT_MM,
            margin: DEFAULT_MARGIN_MM,
        }
    }

    pub const fn new(page_width: f64, page_height: f64, margin: f64) -> Self {
        Self {
            page_width,
            page_height,
            margin,
        }
    }

    /// Width available inside the margins.
    pub fn content_width(&self) -> f64 {
        2.0f64.mul_add(-self.margin, self.page_width)
    }

    /// Height available inside the margins.
    pub fn content_height(&self) -> f64 {
        2.0f64.mul_add(-self.margin, self.page_height)
    }

    /// Check every geometry invariant, naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("geometry.page_width", self.page_width),
            ("geometry.page_height", self.page_height),
            ("geometry.margin", self.margin),
        ] {
            if !value.is_finite() {
                return Err(WssError::invalid(field, format!("must be finite, got {value}")));
            }
            if value <= 0.0 {
                return Err(WssError::invalid(field, format!("must be positive, got {value}")));
            }
        }

        if self.margin >= self.page_width / 2.0 {
            return Err(WssError::invalid(
                "geometry.margin",
                format!(
                    "must be less than half the page width ({}), got {}",
                    self.page_width / 2.0,
                    self.margin
                ),
            ));
        }
        if self.margin >= self.page_height / 2.0 {
            return Err(WssError::invalid(
                "geometry.margin",
                format!(
                    "must be less than half the page height ({}), got {}",
                    self.page_height / 2.0,
                    self.margin
                ),
            ));
        }
        Ok(())
    }
}

/// How a snapshot is scaled into the content area.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleMode {
    /// Fit the content width, then shrink to the content height if needed.
    /// The whole snapshot lands on one page.
    #[default]
    FitPage,
    /// Fill the content width and slice the rest across further pages.
    FitWidth,
}

/// Snapshot dimensions after scaling into document space (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaledImage {
    pub width: f64,
    pub height: f64,
}

impl ScaledImage {
    /// Scale a `pixel_width` x `pixel_height` raster into the content area.
    ///
    /// Callers validate both the geometry and the pixel dimensions first.
    pub fn fit(pixel_width: u32, pixel_height: u32, geometry: &PageGeometry, mode: ScaleMode) -> Self {
        let aspect = f64::from(pixel_width) / f64::from(pixel_height);
        let content_width = geometry.content_width();
        let content_height = geometry.content_height();

        let mut scaled = Self {
            width: content_width,
            height: content_width / aspect,
        };

        if mode == ScaleMode::FitPage && scaled.height > content_height {
            scaled = Self {
                width: content_height * aspect,
                height: content_height,
            };
        }

        trace!(
            aspect,
            width = scaled.width,
            height = scaled.height,
            ?mode,
            "Scaled snapshot into content area"
        );
        scaled
    }
}
