//! Paginated document export.
//!
//! Takes a full-height [`Snapshot`] of the printable palette layout and
//! slices it into margin-respecting bands, one per page. The snapshot's text
//! runs are written on the page whose band holds their baseline.
//!
//! # Usage
//!
//! ```ignore
//! use wss::export::{ExportOptions, PaginatedExporter};
//!
//! let exporter = PaginatedExporter::new(ExportOptions::default());
//! let exported = exporter.export_pdf(&snapshot, DocumentMetadata::default())?;
//! exported.save(Path::new(DEFAULT_FILE_NAME))?;
//! ```

mod fonts;
mod geometry;
pub mod mock;
mod pdf;
mod plan;
mod writer;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub use fonts::{StandardFont, TEXT_ENCODING, encode_win_ansi, text_string};
pub use geometry::{A4_HEIGHT_MM, A4_WIDTH_MM, DEFAULT_MARGIN_MM, PageGeometry, ScaleMode, ScaledImage};
pub use pdf::{DEFAULT_JPEG_QUALITY, DEFAULT_TITLE, DocumentMetadata, PdfWriter, mm_to_pt, save_pdf};
pub use plan::{PageBand, PagePlan, SLACK_MM};
pub use writer::{DocumentWriter, PageText, Placement};

use crate::error::{Result, WssError};
use crate::raster::Snapshot;

/// File name used when the caller does not pick one.
pub const DEFAULT_FILE_NAME: &str = "Worship_Service_Styles.pdf";

/// Knobs for one export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub geometry: PageGeometry,
    pub scale_mode: ScaleMode,
    pub jpeg_quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::a4(),
            scale_mode: ScaleMode::FitPage,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(WssError::invalid(
                "export.jpeg_quality",
                format!("must be 1-100, got {}", self.jpeg_quality),
            ));
        }
        Ok(())
    }
}

/// A finished PDF together with the plan that produced it.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub plan: PagePlan,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    pub fn save(&self, path: &Path) -> Result<()> {
        save_pdf(&self.bytes, path)
    }
}

/// Slices snapshots into pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginatedExporter {
    options: ExportOptions,
}

impl PaginatedExporter {
    pub const fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Compute the band plan for `snapshot` without drawing anything.
    pub fn plan(&self, snapshot: &Snapshot) -> Result<PagePlan> {
        self.options.validate()?;
        PagePlan::new(
            snapshot.width(),
            snapshot.height(),
            self.options.geometry,
            self.options.scale_mode,
        )
    }

    /// Draw every band of `snapshot` into `writer`.
    pub fn export<W: DocumentWriter>(&self, snapshot: &Snapshot, writer: &mut W) -> Result<PagePlan> {
        self.export_with_progress(snapshot, writer, |_| {})
    }

    /// Like [`export`](Self::export), calling `on_band` after each band is placed.
    #[instrument(skip_all, fields(width = snapshot.width(), height = snapshot.height()))]
    pub fn export_with_progress<W, F>(
        &self,
        snapshot: &Snapshot,
        writer: &mut W,
        mut on_band: F,
    ) -> Result<PagePlan>
    where
        W: DocumentWriter,
        F: FnMut(&PageBand),
    {
        let plan = self.plan(snapshot)?;

        for band in &plan.bands {
            if band.page_index > 0 {
                writer.add_page()?;
            }
            let pixels = snapshot.extract_band(band.source_y, band.source_height);
            writer.place_image(&pixels, plan.placement(band))?;

            let mut lines = 0;
            for run in snapshot
                .text()
                .iter()
                .filter(|run| plan.band_for_row(run.baseline) == band.page_index)
            {
                writer.place_text(&plan.text_placement(band, run))?;
                lines += 1;
            }
            debug!(
                page = band.page_index + 1,
                source_y = band.source_y,
                source_height = band.source_height,
                lines,
                "Band placed"
            );
            on_band(band);
        }

        info!(pages = plan.page_count(), "Export complete");
        Ok(plan)
    }

    /// Export straight to PDF bytes.
    pub fn export_pdf(&self, snapshot: &Snapshot, metadata: DocumentMetadata) -> Result<ExportedDocument> {
        self.export_pdf_with_progress(snapshot, metadata, |_| {})
    }

    pub fn export_pdf_with_progress<F>(
        &self,
        snapshot: &Snapshot,
        metadata: DocumentMetadata,
        on_band: F,
    ) -> Result<ExportedDocument>
    where
        F: FnMut(&PageBand),
    {
        // Fail before building a writer
        self.options.validate()?;
        let mut writer = PdfWriter::new(self.options.geometry, self.options.jpeg_quality, metadata);
        let plan = self.export_with_progress(snapshot, &mut writer, on_band)?;
        let bytes = writer.finish()?;
        Ok(ExportedDocument { plan, bytes })
    }
}
