//! User settings: page geometry, export and render defaults, store location.
//!
//! Every field is optional. Unset fields fall back to the built-in defaults,
//! and CLI flags override whatever the file says.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::path::resolve_path;
use crate::error::{Result, WssError};
use crate::export::{DEFAULT_FILE_NAME, ExportOptions, PageGeometry, ScaleMode};
use crate::render::{RenderOptions, ResizeStrategy};

/// Page size and margin in millimetres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_mode: Option<ScaleMode>,
    /// JPEG quality of embedded page images (1-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jpeg_quality: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiles: Option<ResizeStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Database file; relative paths resolve against the config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Settings file contents.
///
/// # Example TOML
///
/// ```toml
/// [page]
/// margin = 15
///
/// [export]
/// scale_mode = "fit-width"
/// jpeg_quality = 90
///
/// [store]
/// path = "~/palettes/history.db"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub page: PageSettings,
    pub export: ExportSettings,
    pub render: RenderSettings,
    pub store: StoreSettings,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page geometry with defaults filled in.
    pub fn geometry(&self) -> PageGeometry {
        let a4 = PageGeometry::a4();
        PageGeometry::new(
            self.page.width.unwrap_or(a4.page_width),
            self.page.height.unwrap_or(a4.page_height),
            self.page.margin.unwrap_or(a4.margin),
        )
    }

    pub fn export_options(&self) -> ExportOptions {
        let defaults = ExportOptions::default();
        ExportOptions {
            geometry: self.geometry(),
            scale_mode: self.export.scale_mode.unwrap_or(defaults.scale_mode),
            jpeg_quality: self.export.jpeg_quality.unwrap_or(defaults.jpeg_quality),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            scale: self.render.scale.unwrap_or(defaults.scale),
            tile_strategy: self.render.tiles.unwrap_or(defaults.tile_strategy),
        }
    }

    /// Output file name for exports.
    pub fn file_name(&self) -> &str {
        self.export.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME)
    }

    /// Configured store path, resolved against `config_dir`.
    pub fn store_path(&self, config_dir: &Path) -> Result<Option<PathBuf>> {
        self.store
            .path
            .as_deref()
            .map(|p| resolve_path(p, config_dir))
            .transpose()
    }

    /// Check every field that is set.
    pub fn validate(&self) -> Result<()> {
        trace!("Validating settings");
        self.export_options()
            .validate()
            .map_err(|e| WssError::ConfigInvalid(e.to_string()))?;
        self.render_options()
            .validate()
            .map_err(|e| WssError::ConfigInvalid(e.to_string()))?;

        if let Some(name) = &self.export.file_name {
            if name.trim().is_empty() {
                return Err(WssError::ConfigInvalid("export.file_name must not be empty".to_string()));
            }
        }
        debug!("Settings validated");
        Ok(())
    }
}
