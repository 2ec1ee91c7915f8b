//! Rasterising the printable palette sheet.
//!
//! Produces the [`Snapshot`] the exporter paginates. The sheet is laid out
//! in CSS-like pixels for a 190 mm wide column at 96 dpi and multiplied by
//! [`RenderOptions::scale`]. Text (title, headings, swatch labels and the
//! notes) travels with the snapshot as runs, for the exporter to write as
//! PDF text.

mod canvas;
mod resize;

pub use resize::{ResizeStrategy, resize_to_tile};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{Result, WssError};
use crate::palette::{HexColor, Palette};
use crate::raster::{FontWeight, Snapshot};
use canvas::{Canvas, TextStyle};

/// Default device-pixel ratio of the snapshot.
pub const DEFAULT_SCALE: u32 = 2;

/// Largest accepted scale.
pub const MAX_SCALE: u32 = 8;

const SHEET_WIDTH: u32 = 718;
const PADDING: u32 = 38;
const CONTENT_WIDTH: u32 = SHEET_WIDTH - 2 * PADDING;
const GAP: u32 = 12;

const TITLE_HEIGHT: u32 = 34;
const TITLE_GAP: u32 = 20;

const HEADING_TEXT: u32 = 25;
const HEADING_PAD: u32 = 4;
const RULE: u32 = 2;
const HEADING_BLOCK: u32 = HEADING_TEXT + HEADING_PAD + RULE + GAP;
const SECTION_GAP: u32 = 20;

const SWATCH: u32 = 64;
const SWATCH_RING: u32 = 2;
const SWATCH_ITEM_HEIGHT: u32 = SWATCH + 4 + 14 + 8;

const TILE_MIN_WIDTH: u32 = 120;
const TILE_IMAGE_HEIGHT: u32 = 120;
const TILE_BORDER: u32 = 1;
const TILE_HEIGHT: u32 = TILE_IMAGE_HEIGHT + 2 * TILE_BORDER;

const NOTE_PAD: u32 = 12;
const NOTE_LINE: u32 = 18;
const NOTE_CHARS_PER_LINE: usize = 95;

/// Heading of the printed sheet.
pub const SHEET_TITLE: &str = "Worship Service Styles";
pub const PALETTE_HEADING: &str = "Paleta Selecionada";
pub const IMAGES_HEADING: &str = "Imagens de Referência";
pub const NOTES_HEADING: &str = "Observações";
/// Shown in the notes box when there are no notes.
pub const EMPTY_NOTES: &str = "Nenhuma observação.";

/// Helvetica cap height per em, used to centre a line in its box.
const CAP_HEIGHT: f64 = 0.72;
const LABEL_GAP: u32 = 4;
const LABEL_LINE: u32 = 14;

const TITLE_COLOR: HexColor = HexColor::new(0x43, 0x38, 0xca);
const HEADING_COLOR: HexColor = HexColor::new(0x1f, 0x29, 0x37);
const RULE_COLOR: HexColor = HexColor::new(0xe5, 0xe7, 0xeb);
const RING_COLOR: HexColor = HexColor::new(0xd1, 0xd5, 0xdb);
const NOTE_BACKGROUND: HexColor = HexColor::new(0xf9, 0xfa, 0xfb);

const TITLE_STYLE: TextStyle = TextStyle {
    size: 24.0,
    color: TITLE_COLOR,
    weight: FontWeight::Bold,
};
const HEADING_STYLE: TextStyle = TextStyle {
    size: 18.0,
    color: HEADING_COLOR,
    weight: FontWeight::Bold,
};
const LABEL_STYLE: TextStyle = TextStyle {
    size: 10.0,
    color: HexColor::new(0x4b, 0x55, 0x63),
    weight: FontWeight::Regular,
};
const NOTE_STYLE: TextStyle = TextStyle {
    size: 12.0,
    color: HexColor::new(0x37, 0x41, 0x51),
    weight: FontWeight::Regular,
};

/// Rendering knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub scale: u32,
    pub tile_strategy: ResizeStrategy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            tile_strategy: ResizeStrategy::default(),
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 || self.scale > MAX_SCALE {
            return Err(WssError::invalid(
                "render.scale",
                format!("must be between 1 and {MAX_SCALE}, got {}", self.scale),
            ));
        }
        Ok(())
    }
}

fn rows(items: usize, per_row: u32) -> u32 {
    (items as u32).div_ceil(per_row.max(1))
}

fn block_height(rows: u32, row_height: u32) -> u32 {
    rows * row_height + rows.saturating_sub(1) * GAP
}

fn swatches_per_row() -> u32 {
    (CONTENT_WIDTH + GAP) / (SWATCH + GAP)
}

fn tile_columns() -> u32 {
    ((CONTENT_WIDTH + GAP) / (TILE_MIN_WIDTH + GAP)).max(1)
}

/// Notes wrapped to the box width. Blank notes show a placeholder.
fn note_text(notes: &str) -> Vec<String> {
    if notes.trim().is_empty() {
        return vec![EMPTY_NOTES.to_string()];
    }
    notes.lines().flat_map(wrap_line).collect()
}

/// Greedy word wrap at [`NOTE_CHARS_PER_LINE`]; longer words are split.
fn wrap_line(line: &str) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current: Vec<char> = Vec::new();
    for word in line.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(NOTE_CHARS_PER_LINE) {
            if !current.is_empty() && current.len() + 1 + piece.len() > NOTE_CHARS_PER_LINE {
                wrapped.push(current.drain(..).collect());
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend_from_slice(piece);
        }
    }
    if !current.is_empty() || wrapped.is_empty() {
        wrapped.push(current.into_iter().collect());
    }
    wrapped
}

fn note_lines(notes: &str) -> u32 {
    note_text(notes).len() as u32
}

/// Baseline that vertically centres a line of `style` in a box.
fn baseline(top: u32, line_height: u32, style: TextStyle) -> f64 {
    f64::from(top) + (f64::from(line_height) + style.size * CAP_HEIGHT) / 2.0
}

/// Sheet height in layout units.
fn sheet_height(palette: &Palette) -> u32 {
    let swatch_rows = rows(palette.colors.len(), swatches_per_row());
    let mut height = PADDING + TITLE_HEIGHT + TITLE_GAP;
    height += HEADING_BLOCK + block_height(swatch_rows, SWATCH_ITEM_HEIGHT) + GAP + SECTION_GAP;

    let images = palette.image_count();
    if images > 0 {
        let tile_rows = rows(images, tile_columns());
        height += HEADING_BLOCK + block_height(tile_rows, TILE_HEIGHT) + GAP + SECTION_GAP;
    }

    height += HEADING_BLOCK + 2 * NOTE_PAD + note_lines(&palette.notes) * NOTE_LINE;
    height + PADDING
}

fn heading(canvas: &mut Canvas, y: u32, title: &str) -> u32 {
    canvas.text(f64::from(PADDING), baseline(y, HEADING_TEXT, HEADING_STYLE), HEADING_STYLE, title);
    canvas.fill_rect(PADDING, y + HEADING_TEXT + HEADING_PAD, CONTENT_WIDTH, RULE, RULE_COLOR);
    y + HEADING_BLOCK
}

/// Render the printable sheet for `palette`.
#[instrument(skip_all, fields(colors = palette.colors.len(), images = palette.image_count(), scale = options.scale))]
pub fn render_palette(palette: &Palette, options: &RenderOptions) -> Result<Snapshot> {
    options.validate()?;

    let height = sheet_height(palette);
    let mut canvas = Canvas::new(SHEET_WIDTH, height, options.scale);

    let mut y = PADDING;
    canvas.text_centred(
        f64::from(SHEET_WIDTH) / 2.0,
        baseline(y, TITLE_HEIGHT, TITLE_STYLE),
        TITLE_STYLE,
        SHEET_TITLE,
    );
    y += TITLE_HEIGHT + TITLE_GAP;

    y = heading(&mut canvas, y, PALETTE_HEADING);
    let per_row = swatches_per_row();
    for (i, entry) in palette.colors.iter().enumerate() {
        let i = i as u32;
        let x = PADDING + (i % per_row) * (SWATCH + GAP);
        let row_y = y + (i / per_row) * (SWATCH_ITEM_HEIGHT + GAP);
        let fill = entry.color.unwrap_or(HexColor::WHITE);
        canvas.ringed_disc(x, row_y, SWATCH, SWATCH_RING, fill, RING_COLOR);
        if let Some(color) = entry.color {
            canvas.text_centred(
                f64::from(x + SWATCH / 2),
                baseline(row_y + SWATCH + LABEL_GAP, LABEL_LINE, LABEL_STYLE),
                LABEL_STYLE,
                &color.to_upper(),
            );
        }
    }
    y += block_height(rows(palette.colors.len(), per_row), SWATCH_ITEM_HEIGHT) + GAP + SECTION_GAP;

    if palette.image_count() > 0 {
        y = heading(&mut canvas, y, IMAGES_HEADING);
        let columns = tile_columns();
        let tile_width = (CONTENT_WIDTH - GAP * (columns - 1)) / columns;
        let scale = canvas.scale();

        for (i, image) in palette.images().enumerate() {
            let i = i as u32;
            let x = PADDING + (i % columns) * (tile_width + GAP);
            let tile_y = y + (i / columns) * (TILE_HEIGHT + GAP);
            canvas.stroke_rect(x, tile_y, tile_width, TILE_HEIGHT, TILE_BORDER, RING_COLOR);

            let inner_w = tile_width - 2 * TILE_BORDER;
            match image.decode() {
                Ok(decoded) => {
                    let bitmap = resize_to_tile(&decoded, inner_w * scale, TILE_IMAGE_HEIGHT * scale, options.tile_strategy);
                    canvas.paste(x + TILE_BORDER, tile_y + TILE_BORDER, &bitmap);
                }
                Err(e) => {
                    warn!(fingerprint = %image.fingerprint(), error = %e, "Skipping undecodable reference image");
                    canvas.fill_rect(x + TILE_BORDER, tile_y + TILE_BORDER, inner_w, TILE_IMAGE_HEIGHT, RULE_COLOR);
                }
            }
        }
        y += block_height(rows(palette.image_count(), columns), TILE_HEIGHT) + GAP + SECTION_GAP;
    }

    y = heading(&mut canvas, y, NOTES_HEADING);
    let lines = note_text(&palette.notes);
    let box_height = 2 * NOTE_PAD + lines.len() as u32 * NOTE_LINE;
    canvas.fill_rect(PADDING, y, CONTENT_WIDTH, box_height, NOTE_BACKGROUND);
    canvas.stroke_rect(PADDING, y, CONTENT_WIDTH, box_height, 1, RULE_COLOR);
    for (i, line) in lines.iter().enumerate() {
        let top = y + NOTE_PAD + i as u32 * NOTE_LINE;
        canvas.text(f64::from(PADDING + NOTE_PAD), baseline(top, NOTE_LINE, NOTE_STYLE), NOTE_STYLE, line);
    }

    let (image, text) = canvas.into_parts();
    debug!(
        width = image.width(),
        height = image.height(),
        text_runs = text.len(),
        "Rendered palette sheet"
    );
    Ok(Snapshot::new(image)?.with_text(text))
}
