//! Human-friendly output using `console` styling.

use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, instrument, trace};

use crate::error::WssError;
use crate::history::{History, PaletteRecord};
use crate::palette::{ColorEntry, Palette};
use crate::theme::WssTheme;

use super::{ExportReport, Output, RenderReport};

const NOTES_PREVIEW: usize = 40;

/// Styled terminal output for human users.
pub struct HumanOutput {
    out: Term,
    err: Term,
    theme: WssTheme,
    quiet: bool,
}

impl HumanOutput {
    #[instrument]
    pub fn new(color: bool, quiet: bool) -> Self {
        debug!("Creating HumanOutput");
        if !color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme: WssTheme::default(),
            quiet,
        }
    }

    fn line(&self, text: &str) {
        // Nothing useful to do if stdout is gone.
        let _ = self.out.write_line(text);
    }

    fn label(&self, name: &str) -> String {
        self.theme.label.apply_to(format!("  {name:<10}")).to_string()
    }

    fn color_line(&self, entry: &ColorEntry) {
        let (swatch, value) = match entry.color {
            Some(color) => (WssTheme::swatch(color.rgb()), color.to_upper()),
            None => ("    ".to_string(), "(blank)".to_string()),
        };
        self.line(&format!(
            "  {:<16} {swatch} {}",
            self.theme.color_id.apply_to(&entry.id),
            self.theme.value.apply_to(value)
        ));
        for image in &entry.images {
            self.line(&format!("  {:<16}      {}", "", self.theme.fingerprint.apply_to(image)));
        }
    }

    fn notes_block(&self, notes: &str) {
        if notes.trim().is_empty() {
            self.line(&format!("{}{}", self.label("Notes"), self.theme.muted.apply_to("(none)")));
            return;
        }
        self.line(&self.label("Notes"));
        for line in notes.lines() {
            self.line(&format!("    {line}"));
        }
    }
}

fn preview(notes: &str) -> String {
    let first = notes.lines().next().unwrap_or("").trim();
    if first.chars().count() > NOTES_PREVIEW {
        let cut: String = first.chars().take(NOTES_PREVIEW - 3).collect();
        format!("{cut}...")
    } else {
        first.to_string()
    }
}

impl Output for HumanOutput {
    fn success(&self, message: &str) {
        self.line(&format!("{} {message}", self.theme.success.apply_to("[OK]")));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &WssError) {
        debug!(error = %error, recoverable = error.is_user_recoverable(), "Outputting error");
        let _ = self.err.write_line(&format!(
            "{} {}",
            self.theme.error.apply_to("[ERR]"),
            self.theme.value.apply_to(error)
        ));
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            let _ = self
                .err
                .write_line(&format!("      {}", self.theme.muted.apply_to(suggestion)));
        }
    }

    fn warning(&self, message: &str) {
        let _ = self
            .err
            .write_line(&format!("{} {message}", self.theme.warning.apply_to("[WARN]")));
    }

    #[instrument(skip_all, fields(colors = palette.colors.len()))]
    fn palette(&self, palette: &Palette) {
        self.line(&format!(
            "{} {}",
            self.theme.header.apply_to("Palette"),
            self.theme.muted.apply_to(format!(
                "({} colors, {} images)",
                palette.colors.len(),
                palette.image_count()
            ))
        ));
        if palette.colors.is_empty() {
            self.line(&format!("  {}", self.theme.muted.apply_to("No colors")));
        }
        for entry in &palette.colors {
            self.color_line(entry);
        }
        self.notes_block(&palette.notes);
    }

    fn palette_saved(&self, record: &PaletteRecord) {
        self.success(&format!(
            "Saved palette {} ({} colors, {} images)",
            record.id,
            record.colors.len(),
            record.image_count()
        ));
    }

    #[instrument(skip_all, fields(records = history.len()))]
    fn history_list(&self, history: &History) {
        if history.is_empty() {
            self.line(&format!("  {}", self.theme.muted.apply_to("No saved palettes")));
            return;
        }
        self.line(&format!(
            "{} {}",
            self.theme.header.apply_to("Saved palettes"),
            self.theme.muted.apply_to(format!("({})", history.len()))
        ));
        for record in history.records() {
            let swatches: String = record
                .colors
                .iter()
                .filter_map(|c| c.color)
                .map(|c| WssTheme::swatch(c.rgb()))
                .collect();
            self.line(&format!(
                "  {}  {}  {swatches}  {}",
                self.theme.color_id.apply_to(record.id),
                self.theme.muted.apply_to(&record.date),
                preview(&record.notes)
            ));
        }
    }

    fn history_record(&self, record: &PaletteRecord) {
        self.line(&format!(
            "{} {}",
            self.theme.header.apply_to(format!("Palette {}", record.id)),
            self.theme.muted.apply_to(&record.date)
        ));
        for entry in &record.colors {
            self.color_line(entry);
        }
        self.notes_block(&record.notes);
    }

    fn snapshot_rendered(&self, report: &RenderReport) {
        self.success(&format!(
            "Rendered {}x{} snapshot to {}",
            report.width, report.height, report.path
        ));
    }

    #[instrument(skip_all, fields(pages = report.pages, dry_run = report.dry_run))]
    fn export_report(&self, report: &ExportReport) {
        if report.dry_run {
            self.line(&format!(
                "{} {}",
                self.theme.header.apply_to("Export plan"),
                self.theme.muted.apply_to("(dry run)")
            ));
        }
        let g = &report.geometry;
        self.line(&format!(
            "{}{}",
            self.label("Snapshot"),
            self.theme.value.apply_to(format!("{}x{} px", report.pixel_width, report.pixel_height))
        ));
        self.line(&format!(
            "{}{} x {} mm, margin {} mm",
            self.label("Page"),
            g.page_width,
            g.page_height,
            g.margin
        ));
        self.line(&format!(
            "{}{:.2} x {:.2} mm ({:?})",
            self.label("Image"),
            report.image.width,
            report.image.height,
            report.scale_mode
        ));
        self.line(&format!("{}{}", self.label("Pages"), self.theme.value.apply_to(report.pages)));
        if report.dry_run {
            for band in &report.bands {
                self.line(&format!(
                    "    page {:>3}  rows {:>6}..{:<6} {:>8.2} mm",
                    band.page_index + 1,
                    band.source_y,
                    band.source_y + band.source_height,
                    band.height
                ));
            }
        }
        if let (Some(path), Some(bytes)) = (&report.path, report.bytes) {
            self.success(&format!("Exported {} page(s) to {path} ({bytes} bytes)", report.pages));
        }
    }

    fn band_progress(&self, total: usize) -> ProgressBar {
        if self.quiet || !self.err.is_term() {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} placing pages [{bar:30}] {pos}/{len}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        self.line(&self.theme.header.apply_to("wss").to_string());
        self.line(&format!("{}{}", self.label("Version"), self.theme.value.apply_to(version)));
        if let Some(sha) = git_sha {
            self.line(&format!("{}{}", self.label("Git SHA"), self.theme.value.apply_to(sha)));
        }
        if let Some(time) = build_time {
            self.line(&format!("{}{}", self.label("Built"), self.theme.muted.apply_to(time)));
        }
        if let Some(rustc) = option_env!("VERGEN_RUSTC_SEMVER") {
            self.line(&format!("{}{}", self.label("Rust"), self.theme.muted.apply_to(rustc)));
        }
        if let Some(target) = option_env!("VERGEN_CARGO_TARGET_TRIPLE") {
            self.line(&format!("{}{}", self.label("Target"), self.theme.muted.apply_to(target)));
        }
    }
}
