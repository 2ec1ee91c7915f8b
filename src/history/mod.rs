//! Palette history and the working draft.
//!
//! Both are JSON values in a [`KeyValueStore`]. History lives under
//! [`HISTORY_KEY`], the palette being edited under [`DRAFT_KEY`].

mod record;
mod store;

pub use record::{DATE_FORMAT, History, PaletteRecord};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, default_store_path};

use tracing::{debug, warn};

use crate::error::{Result, WssError};
use crate::palette::Palette;

/// Store key for the saved palettes.
pub const HISTORY_KEY: &str = "worshipServiceStylesHistory";

/// Store key for the palette being edited.
pub const DRAFT_KEY: &str = "currentPalette";

/// Reads and writes history and draft through a store.
pub struct HistoryRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> HistoryRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Saved palettes. Missing or unreadable history yields an empty list.
    pub fn load_history(&self) -> Result<History> {
        let Some(raw) = self.store.get(HISTORY_KEY)? else {
            debug!("No history stored yet");
            return Ok(History::new());
        };
        match serde_json::from_str::<History>(&raw) {
            Ok(history) => {
                debug!(records = history.len(), "Loaded history");
                Ok(history)
            }
            Err(e) => {
                warn!(error = %e, "Stored history is unreadable, starting empty");
                Ok(History::new())
            }
        }
    }

    pub fn save_history(&mut self, history: &History) -> Result<()> {
        let json = serde_json::to_string(history)
            .map_err(|e| WssError::Store(format!("Failed to serialize history: {e}")))?;
        self.store.set(HISTORY_KEY, &json)
    }

    /// The palette being edited, or the default palette when none is stored.
    pub fn load_draft(&self) -> Result<Palette> {
        let Some(raw) = self.store.get(DRAFT_KEY)? else {
            return Ok(Palette::default());
        };
        match serde_json::from_str::<Palette>(&raw) {
            Ok(palette) => Ok(palette),
            Err(e) => {
                warn!(error = %e, "Stored draft is unreadable, using defaults");
                Ok(Palette::default())
            }
        }
    }

    pub fn save_draft(&mut self, palette: &Palette) -> Result<()> {
        let json = serde_json::to_string(palette)
            .map_err(|e| WssError::Store(format!("Failed to serialize palette: {e}")))?;
        self.store.set(DRAFT_KEY, &json)
    }

    /// Drop the stored draft so the next load starts from the defaults.
    ///
    /// Returns whether a draft was stored.
    pub fn clear_draft(&mut self) -> Result<bool> {
        let removed = self.store.remove(DRAFT_KEY)?;
        debug!(removed, "Cleared draft palette");
        Ok(removed)
    }
}
