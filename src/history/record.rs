//! Saved palettes and the ordered history list.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, WssError};
use crate::palette::{ColorEntry, Palette};

/// Display format for the saved-at date (day first, like the pt-BR locale).
pub const DATE_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// A palette saved to history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteRecord {
    /// Epoch milliseconds at save time.
    pub id: i64,
    pub colors: Vec<ColorEntry>,
    #[serde(default)]
    pub notes: String,
    /// Human-readable save date.
    #[serde(default)]
    pub date: String,
}

impl PaletteRecord {
    /// The palette to edit when this record is loaded.
    pub fn to_palette(&self) -> Palette {
        Palette::new(self.colors.clone(), self.notes.clone())
    }

    pub fn image_count(&self) -> usize {
        self.colors.iter().map(|c| c.images.len()).sum()
    }
}

/// Saved palettes, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<PaletteRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<PaletteRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PaletteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&PaletteRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Palette stored under `id`, ready for editing.
    pub fn load(&self, id: i64) -> Result<Palette> {
        self.find(id)
            .map(PaletteRecord::to_palette)
            .ok_or(WssError::PaletteNotFound { id })
    }

    /// New history with `palette` prepended.
    ///
    /// Blank colors are dropped. A palette with no colors left and blank
    /// notes is not recorded.
    pub fn with_saved(&self, palette: &Palette, now: DateTime<Local>) -> Result<(Self, PaletteRecord)> {
        let cleaned = palette.without_blank_colors();
        if cleaned.colors.is_empty() && cleaned.notes.trim().is_empty() {
            return Err(WssError::EmptyPalette);
        }

        // Two saves in the same millisecond still get distinct ids.
        let mut id = now.timestamp_millis();
        while self.find(id).is_some() {
            id += 1;
        }

        let record = PaletteRecord {
            id,
            colors: cleaned.colors,
            notes: cleaned.notes,
            date: now.format(DATE_FORMAT).to_string(),
        };
        info!(id, colors = record.colors.len(), "Palette saved to history");

        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.push(record.clone());
        records.extend(self.records.iter().cloned());
        Ok((Self { records }, record))
    }

    /// New history without `id`, and whether it was present.
    pub fn without(&self, id: i64) -> (Self, bool) {
        let records: Vec<_> = self.records.iter().filter(|r| r.id != id).cloned().collect();
        let removed = records.len() != self.records.len();
        debug!(id, removed, "Deleting palette from history");
        (Self { records }, removed)
    }
}
