//! Output mode abstraction for robot and human output.

use std::path::Path;

use indicatif::ProgressBar;
use serde::Serialize;

use crate::cli::Cli;
use crate::error::WssError;
use crate::export::{PageBand, PageGeometry, PagePlan, ScaleMode, ScaledImage};
use crate::history::{History, PaletteRecord};
use crate::palette::Palette;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// Summary of an export, or of what an export would do.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub dry_run: bool,
    pub pages: usize,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub scale_mode: ScaleMode,
    pub geometry: PageGeometry,
    pub image: ScaledImage,
    pub bands: Vec<PageBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
}

impl ExportReport {
    pub fn from_plan(plan: &PagePlan) -> Self {
        Self {
            path: None,
            dry_run: true,
            pages: plan.page_count(),
            pixel_width: plan.pixel_width,
            pixel_height: plan.pixel_height,
            scale_mode: plan.scale_mode,
            geometry: plan.geometry,
            image: plan.image,
            bands: plan.bands.clone(),
            bytes: None,
        }
    }

    /// Mark the report as a finished export written to `path`.
    #[must_use]
    pub fn written(mut self, path: &Path, bytes: usize) -> Self {
        self.path = Some(path.display().to_string());
        self.dry_run = false;
        self.bytes = Some(bytes);
        self
    }
}

/// A rendered snapshot written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// JSON output for agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human { color: bool, quiet: bool },
}

impl OutputMode {
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human {
                color: !cli.no_color,
                quiet: cli.quiet,
            }
        }
    }

    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human { color, quiet } => Box::new(HumanOutput::new(color, quiet)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &WssError);
    fn warning(&self, message: &str);

    // Palette
    fn palette(&self, palette: &Palette);

    // History
    fn palette_saved(&self, record: &PaletteRecord);
    fn history_list(&self, history: &History);
    fn history_record(&self, record: &PaletteRecord);

    // Rendering and export
    fn snapshot_rendered(&self, report: &RenderReport);
    fn export_report(&self, report: &ExportReport);

    /// Progress bar for placing `total` bands; hidden when not interactive.
    fn band_progress(&self, total: usize) -> ProgressBar;

    // Metadata
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>);
}
