//! Robot mode JSON output.

use indicatif::ProgressBar;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument, trace};

use crate::error::WssError;
use crate::history::{History, PaletteRecord};
use crate::palette::Palette;

use super::{ExportReport, Output, RenderReport, RobotFormat};

/// JSON output for agents and scripting.
pub struct RobotOutput {
    format: RobotFormat,
}

fn serialization_failure(e: &serde_json::Error) -> String {
    json!({ "error": true, "message": format!("serialization failed: {e}") }).to_string()
}

/// Palette with image fingerprints alongside the data URLs.
fn palette_json(palette: &Palette) -> serde_json::Value {
    json!({
        "colors": palette.colors.iter().map(|c| json!({
            "id": c.id,
            "color": c.color.map(|h| h.to_string()).unwrap_or_default(),
            "images": c.images.iter().map(|img| json!({
                "fingerprint": img.fingerprint(),
                "mime_type": img.mime_type(),
                "data_url": img.as_data_url(),
            })).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "notes": palette.notes,
        "image_count": palette.image_count(),
    })
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    fn render<T: Serialize + ?Sized>(&self, data: &T) -> String {
        let result = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        result.unwrap_or_else(|e| serialization_failure(&e))
    }

    /// Output any serializable data as JSON to stdout.
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = self.render(data);
        trace!(json_len = json.len(), "JSON serialized");
        println!("{json}");
    }
}

impl Output for RobotOutput {
    fn success(&self, message: &str) {
        self.output_json(&json!({ "success": true, "message": message }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &WssError) {
        debug!(error = %error, "Robot: error");
        let body = json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{}", self.render(&body));
    }

    fn warning(&self, message: &str) {
        eprintln!("{}", self.render(&json!({ "warning": true, "message": message })));
    }

    fn palette(&self, palette: &Palette) {
        self.output_json(&palette_json(palette));
    }

    fn palette_saved(&self, record: &PaletteRecord) {
        self.output_json(&json!({
            "success": true,
            "id": record.id,
            "date": record.date,
            "colors": record.colors.len(),
            "images": record.image_count(),
        }));
    }

    fn history_list(&self, history: &History) {
        let items: Vec<_> = history
            .records()
            .iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "date": r.date,
                    "colors": r.colors.iter().filter_map(|c| c.color.map(|h| h.to_string())).collect::<Vec<_>>(),
                    "images": r.image_count(),
                    "notes": r.notes,
                })
            })
            .collect();
        self.output_json(&items);
    }

    fn history_record(&self, record: &PaletteRecord) {
        let mut value = palette_json(&record.to_palette());
        value["id"] = json!(record.id);
        value["date"] = json!(record.date);
        self.output_json(&value);
    }

    fn snapshot_rendered(&self, report: &RenderReport) {
        self.output_json(report);
    }

    fn export_report(&self, report: &ExportReport) {
        self.output_json(report);
    }

    fn band_progress(&self, _total: usize) -> ProgressBar {
        ProgressBar::hidden()
    }

    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        self.output_json(&json!({
            "version": version,
            "git_sha": git_sha,
            "build_time": build_time,
            "rustc": option_env!("VERGEN_RUSTC_SEMVER"),
            "target": option_env!("VERGEN_CARGO_TARGET_TRIPLE"),
        }));
    }
}
