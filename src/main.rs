//! wss - worship service palettes with paginated PDF export.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{CommandFactory, Parser};
use console::Style;
use serde::Serialize;
use tracing::{debug, info};

use wss::cli::{Cli, Commands, CompletionsArgs, ExportArgs, HistoryCommand, PaletteCommand, RenderArgs, RenderFlags};
use wss::config::{self, Settings};
use wss::error::{Result, WssError};
use wss::export::{DocumentMetadata, ExportOptions, PageGeometry, PaginatedExporter};
use wss::history::{self, HistoryRepository, SqliteStore};
use wss::logging::init_logging;
use wss::output::{ExportReport, Output, OutputMode, RenderReport};
use wss::palette::{HexColor, Palette, ReferenceImage};
use wss::raster::Snapshot;
use wss::render::{RenderOptions, render_palette};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> Option<String> {
        let sha = option_env!("VERGEN_GIT_SHA")?;
        if matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true")) {
            Some(format!("{sha} (dirty)"))
        } else {
            Some(sha.to_string())
        }
    }

    pub fn build_timestamp() -> Option<&'static str> {
        option_env!("VERGEN_BUILD_TIMESTAMP")
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    let output = OutputMode::from_cli(&cli).into_output();
    if let Err(e) = run(&cli, output.as_ref()) {
        output.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, out: &dyn Output) -> Result<()> {
    match &cli.command {
        None => {
            print_quick_start(cli);
            Ok(())
        }
        Some(Commands::Palette(command)) => cmd_palette(&Context::load(cli)?, out, command),
        Some(Commands::Save) => cmd_save(&Context::load(cli)?, out),
        Some(Commands::History(command)) => cmd_history(&Context::load(cli)?, out, command),
        Some(Commands::Render(args)) => cmd_render(&Context::load(cli)?, out, args),
        Some(Commands::Export(args)) => cmd_export(&Context::load(cli)?, out, args),
        Some(Commands::Version) => {
            let sha = build_info::git_sha();
            out.version_info(build_info::VERSION, sha.as_deref(), build_info::build_timestamp());
            Ok(())
        }
        Some(Commands::Completions(args)) => {
            cmd_completions(args);
            Ok(())
        }
    }
}

// === Settings and storage ===

/// Settings plus the resolved history location for one invocation.
struct Context {
    settings: Settings,
    store_path: PathBuf,
}

impl Context {
    fn load(cli: &Cli) -> Result<Self> {
        let (settings, config_dir) = match &cli.config {
            Some(path) => {
                let path = config::expand_home(path)?.unwrap_or_else(|| path.clone());
                (config::load_settings(&path)?, parent_dir(&path))
            }
            None => match config::default_config_path() {
                Ok(path) => (config::load_settings_or_default(&path)?, parent_dir(&path)),
                Err(e) => {
                    debug!(error = %e, "No config directory, using defaults");
                    (Settings::default(), PathBuf::from("."))
                }
            },
        };

        let store_path = match &cli.store {
            Some(path) => config::expand_home(path)?.unwrap_or_else(|| path.clone()),
            None => match settings.store_path(&config_dir)? {
                Some(path) => path,
                None => history::default_store_path()?,
            },
        };
        debug!(store = %store_path.display(), "Resolved history store");

        Ok(Self { settings, store_path })
    }

    fn repository(&self) -> Result<HistoryRepository<SqliteStore>> {
        Ok(HistoryRepository::new(SqliteStore::open(&self.store_path)?))
    }

    fn render_options(&self, flags: &RenderFlags) -> RenderOptions {
        let mut options = self.settings.render_options();
        if let Some(scale) = flags.scale {
            options.scale = scale;
        }
        if let Some(tiles) = flags.tiles {
            options.tile_strategy = tiles;
        }
        options
    }

    fn export_options(&self, args: &ExportArgs) -> ExportOptions {
        let mut options = self.settings.export_options();
        let g = options.geometry;
        options.geometry = PageGeometry::new(
            args.page_width.unwrap_or(g.page_width),
            args.page_height.unwrap_or(g.page_height),
            args.margin.unwrap_or(g.margin),
        );
        if let Some(mode) = args.scale_mode {
            options.scale_mode = mode;
        }
        if let Some(quality) = args.quality {
            options.jpeg_quality = quality;
        }
        options
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

// === Quick Start ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    editing: RobotEditing,
    history: RobotHistory,
    export: RobotExport,
    output_modes: OutputModes,
}

#[derive(Serialize)]
struct RobotEditing {
    show: &'static str,
    set_color: &'static str,
    add_color: &'static str,
    attach_image: &'static str,
    notes: &'static str,
}

#[derive(Serialize)]
struct RobotHistory {
    save: &'static str,
    list: &'static str,
    load: &'static str,
}

#[derive(Serialize)]
struct RobotExport {
    pdf: &'static str,
    plan_only: &'static str,
    from_image: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

fn print_quick_start(cli: &Cli) {
    if cli.use_json() {
        let help = RobotQuickStart {
            tool: "wss",
            version: build_info::VERSION,
            description: "Worship service color palettes with paginated PDF export",
            editing: RobotEditing {
                show: "wss palette show --robot",
                set_color: "wss palette set-color <COLOR_ID> <HEX>",
                add_color: "wss palette add-color",
                attach_image: "wss palette attach <COLOR_ID> <IMAGE>...",
                notes: "wss palette notes \"<TEXT>\"",
            },
            history: RobotHistory {
                save: "wss save",
                list: "wss history list --robot",
                load: "wss history load <ID>",
            },
            export: RobotExport {
                pdf: "wss export -o palette.pdf",
                plan_only: "wss export --dry-run --robot",
                from_image: "wss export --snapshot sheet.png --scale-mode fit-width",
            },
            output_modes: OutputModes {
                human: "--format=text (default)",
                robot: "--robot or --format=json",
                compact: "--format=json-compact",
            },
        };
        let json = if cli.use_compact_json() {
            serde_json::to_string(&help)
        } else {
            serde_json::to_string_pretty(&help)
        };
        if let Ok(json) = json {
            println!("{json}");
        }
        return;
    }

    let title = Style::new().bold().underlined();
    let cmd = Style::new().green();
    println!("{} {} - worship service styles\n", Style::new().bold().cyan().apply_to("wss"), build_info::VERSION);
    println!("{}\n", title.apply_to("QUICK START"));
    for (example, what) in [
        ("wss palette show", "Show the working palette"),
        ("wss palette set-color color-1 ff0000", "Change a color"),
        ("wss palette attach color-1 photo.jpg", "Attach a reference photo"),
        ("wss palette notes \"Advent\"", "Set notes"),
        ("wss save", "Save to history"),
        ("wss export", "Export the PDF"),
    ] {
        println!("  {:<40} {what}", cmd.apply_to(example));
    }
    println!("\n{}\n", title.apply_to("ROBOT MODE"));
    println!("  {:<40} JSON output", Style::new().cyan().apply_to("wss --robot <command>"));
    println!("\nRun {} for full help", Style::new().yellow().apply_to("wss --help"));
}

// === Command Implementations ===

fn cmd_palette(ctx: &Context, out: &dyn Output, command: &PaletteCommand) -> Result<()> {
    let mut repo = ctx.repository()?;
    let draft = repo.load_draft()?;

    let updated = match command {
        PaletteCommand::Show => {
            out.palette(&draft);
            return Ok(());
        }
        PaletteCommand::AddColor => draft.with_color_added(),
        PaletteCommand::SetColor { id, color } => draft.with_color_changed(id, HexColor::parse(color)?)?,
        PaletteCommand::RemoveColor { id } => draft.with_color_removed(id)?,
        PaletteCommand::Attach { id, images } => {
            let mut palette = draft;
            for path in images {
                palette = palette.with_image_attached(id, ReferenceImage::from_path(path)?)?;
            }
            palette
        }
        PaletteCommand::Detach { id, image } => draft.with_image_removed(id, image)?,
        PaletteCommand::Notes { text } => draft.with_notes(text.as_str()),
        PaletteCommand::Reset => {
            repo.clear_draft()?;
            let palette = Palette::reset();
            out.palette(&palette);
            return Ok(());
        }
    };

    repo.save_draft(&updated)?;
    out.palette(&updated);
    Ok(())
}

fn cmd_save(ctx: &Context, out: &dyn Output) -> Result<()> {
    let mut repo = ctx.repository()?;
    let draft = repo.load_draft()?;
    let (history, record) = repo.load_history()?.with_saved(&draft, Local::now())?;

    repo.save_history(&history)?;
    repo.clear_draft()?;
    out.palette_saved(&record);
    Ok(())
}

fn cmd_history(ctx: &Context, out: &dyn Output, command: &HistoryCommand) -> Result<()> {
    let mut repo = ctx.repository()?;
    let history = repo.load_history()?;

    match command {
        HistoryCommand::List => out.history_list(&history),
        HistoryCommand::Show { id } => {
            let record = history.find(*id).ok_or(WssError::PaletteNotFound { id: *id })?;
            out.history_record(record);
        }
        HistoryCommand::Load { id } => {
            let palette = history.load(*id)?;
            repo.save_draft(&palette)?;
            out.palette(&palette);
        }
        HistoryCommand::Delete { id } => {
            let (remaining, removed) = history.without(*id);
            if !removed {
                return Err(WssError::PaletteNotFound { id: *id });
            }
            repo.save_history(&remaining)?;
            out.success(&format!("Deleted palette {id}"));
        }
    }
    Ok(())
}

fn cmd_render(ctx: &Context, out: &dyn Output, args: &RenderArgs) -> Result<()> {
    let draft = ctx.repository()?.load_draft()?;
    let snapshot = render_palette(&draft, &ctx.render_options(&args.render))?;
    snapshot.save(&args.output)?;
    info!(path = %args.output.display(), "Snapshot written");

    out.snapshot_rendered(&RenderReport {
        path: args.output.display().to_string(),
        width: snapshot.width(),
        height: snapshot.height(),
    });
    Ok(())
}

fn cmd_export(ctx: &Context, out: &dyn Output, args: &ExportArgs) -> Result<()> {
    let exporter = PaginatedExporter::new(ctx.export_options(args));

    let (snapshot, notes) = match &args.snapshot {
        Some(path) => {
            if args.render.scale.is_some() || args.render.tiles.is_some() {
                out.warning("--scale and --tiles are ignored with --snapshot");
            }
            (Snapshot::open(path)?, String::new())
        }
        None => {
            let draft = ctx.repository()?.load_draft()?;
            (render_palette(&draft, &ctx.render_options(&args.render))?, draft.notes)
        }
    };

    let plan = exporter.plan(&snapshot)?;
    if args.dry_run {
        out.export_report(&ExportReport::from_plan(&plan));
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(ctx.settings.file_name()));
    let metadata = DocumentMetadata::default().with_subject(&notes);

    let bar = out.band_progress(plan.page_count());
    let document = exporter.export_pdf_with_progress(&snapshot, metadata, |_| bar.inc(1));
    bar.finish_and_clear();
    let document = document?;

    document.save(&path)?;
    out.export_report(&ExportReport::from_plan(&document.plan).written(&path, document.bytes.len()));
    Ok(())
}

fn cmd_completions(args: &CompletionsArgs) {
    clap_complete::generate(args.shell, &mut Cli::command(), "wss", &mut io::stdout());
}
