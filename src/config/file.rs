//! Reading and writing settings files in YAML or TOML.

use std::path::Path;

use tracing::{debug, info, instrument, trace};

use super::settings::Settings;
use crate::error::{Result, WssError};

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml).
    Yaml,
    /// TOML format (.toml).
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        trace!(extension = %ext, "Detecting config format from extension");
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }

    fn detect(path: &Path) -> Result<Self> {
        Self::from_extension(path).ok_or_else(|| {
            WssError::ConfigParse(format!(
                "Unknown config format for '{}': expected .yaml, .yml, or .toml",
                path.display()
            ))
        })
    }
}

/// Load and validate settings from a file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let format = ConfigFormat::detect(path)?;
    debug!(format = ?format, "Detected config format");

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WssError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            WssError::Io(e)
        }
    })?;
    debug!(bytes = content.len(), "Read config file");

    load_settings_from_str(&content, format)
}

/// Parse and validate settings from a string.
pub fn load_settings_from_str(content: &str, format: ConfigFormat) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings = match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| WssError::ConfigParse(format!("YAML: {e}")))?
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| WssError::ConfigParse(format!("TOML: {e}")))?
        }
    };
    settings.validate()?;

    info!(
        scale_mode = ?settings.export.scale_mode,
        margin = ?settings.page.margin,
        store = ?settings.store.path,
        "Configuration loaded"
    );
    Ok(settings)
}

/// Load `path` if it exists; otherwise defaults.
///
/// Only for the implicit default location. An explicitly named file that is
/// missing is an error.
pub fn load_settings_or_default(path: &Path) -> Result<Settings> {
    if path.exists() {
        load_settings(path)
    } else {
        debug!(path = %path.display(), "No config file, using defaults");
        Ok(Settings::default())
    }
}

/// Write settings, format chosen by extension.
#[instrument(skip(settings), fields(path = %path.as_ref().display()))]
pub fn save_settings<P: AsRef<Path>>(settings: &Settings, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = ConfigFormat::detect(path)?;

    let content = match format {
        ConfigFormat::Yaml => {
            serde_yaml::to_string(settings).map_err(|e| WssError::ConfigParse(format!("YAML: {e}")))?
        }
        ConfigFormat::Toml => {
            toml::to_string_pretty(settings).map_err(|e| WssError::ConfigParse(format!("TOML: {e}")))?
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    info!("Configuration saved");
    Ok(())
}
