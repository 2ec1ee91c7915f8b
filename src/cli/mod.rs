//! CLI argument definitions.

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::export::ScaleMode;
use crate::render::ResizeStrategy;

/// Worship service styles: build color palettes with reference photos and
/// export them as paginated A4 PDFs.
///
/// Robot Mode: use --robot or --format json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "wss", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(long, short = 'f', default_value = "text", global = true, env = "WSS_FORMAT")]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Settings file (.toml, .yaml or .yml)
    #[arg(long, short = 'c', global = true, env = "WSS_CONFIG")]
    pub config: Option<PathBuf>,

    /// History database file
    #[arg(long, global = true, env = "WSS_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Editing ===
    /// Edit the working palette
    #[command(subcommand)]
    Palette(PaletteCommand),

    /// Save the working palette to history and start a fresh one
    Save,

    // === History ===
    /// Browse saved palettes
    #[command(subcommand)]
    History(HistoryCommand),

    // === Output ===
    /// Render the printable sheet of the working palette to an image
    ///
    /// The image holds the swatches, photos and boxes. Titles, labels and
    /// notes are written as text by `export`.
    Render(RenderArgs),

    /// Export the working palette as a paginated PDF
    Export(ExportArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Subcommand, Debug)]
pub enum PaletteCommand {
    /// Show colors, reference images and notes
    Show,

    /// Append a white color
    AddColor,

    /// Change a color's value
    SetColor {
        /// Color id (see `wss palette show`)
        id: String,
        /// Hex value, e.g. "#ff0000" or "ff0000"
        color: String,
    },

    /// Remove a color and its images
    RemoveColor {
        /// Color id
        id: String,
    },

    /// Attach reference photos to a color (at most 3 per color)
    Attach {
        /// Color id
        id: String,
        /// Image files (PNG, JPEG, GIF, BMP, WebP)
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Detach a reference photo by fingerprint prefix
    Detach {
        /// Color id
        id: String,
        /// Fingerprint or unique prefix of it
        image: String,
    },

    /// Replace the notes
    Notes {
        /// New notes; omit to clear
        #[arg(default_value = "")]
        text: String,
    },

    /// Discard edits and restore the default colors
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List saved palettes, newest first
    List,

    /// Show one saved palette
    Show {
        /// Palette id
        id: i64,
    },

    /// Copy a saved palette into the working palette
    Load {
        /// Palette id
        id: i64,
    },

    /// Delete a saved palette
    Delete {
        /// Palette id
        id: i64,
    },
}

/// Rendering flags shared by `render` and `export`.
#[derive(Args, Debug, Default)]
pub struct RenderFlags {
    /// Device-pixel ratio of the rendered sheet
    #[arg(long)]
    pub scale: Option<u32>,

    /// How reference photos are fitted into tiles
    #[arg(long)]
    pub tiles: Option<ResizeStrategy>,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Output image path (format from extension)
    pub output: PathBuf,

    #[command(flatten)]
    pub render: RenderFlags,
}

/// Arguments for PDF export.
///
/// # Examples
///
/// ```bash
/// # Export the working palette to the configured file name
/// wss export
///
/// # Paginate a pre-rendered snapshot across full-width pages
/// wss export --snapshot sheet.png --scale-mode fit-width -o sheet.pdf
///
/// # Show the band plan without writing anything
/// wss export --dry-run
/// ```
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Output PDF path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Paginate this image instead of rendering the working palette; no
    /// text is added to it
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// How the snapshot is scaled into the content area
    #[arg(long)]
    pub scale_mode: Option<ScaleMode>,

    /// Page width in mm
    #[arg(long)]
    pub page_width: Option<f64>,

    /// Page height in mm
    #[arg(long)]
    pub page_height: Option<f64>,

    /// Margin on every side in mm
    #[arg(long)]
    pub margin: Option<f64>,

    /// JPEG quality of page images (1-100)
    #[arg(long)]
    pub quality: Option<u8>,

    /// Show the page plan without writing a file
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    #[command(flatten)]
    pub render: RenderFlags,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
