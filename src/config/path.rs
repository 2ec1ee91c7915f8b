//! Path helpers for settings files.
//!
//! Supports absolute paths, paths relative to the config file, and "~" home
//! directory expansion.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Result, WssError};

/// Resolve a path from a config file.
///
/// Resolution rules:
/// 1. Paths starting with `~`: expanded to home directory
/// 2. Absolute paths: used as-is
/// 3. Relative paths: resolved relative to `config_dir`
pub fn resolve_path(path: &Path, config_dir: &Path) -> Result<PathBuf> {
    trace!(
        path = %path.display(),
        config_dir = %config_dir.display(),
        "Resolving path"
    );

    if let Some(expanded) = expand_home(path)? {
        debug!(original = %path.display(), resolved = %expanded.display(), "Expanded home directory path");
        return Ok(expanded);
    }

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let resolved = config_dir.join(path);
    debug!(original = %path.display(), resolved = %resolved.display(), "Resolved relative path");
    Ok(resolved)
}

/// Expand a leading `~`. Returns `None` for paths without one.
pub fn expand_home(path: &Path) -> Result<Option<PathBuf>> {
    let path_str = path.to_string_lossy();
    if path_str == "~" {
        return home_dir().map(Some);
    }
    match path_str.strip_prefix("~/") {
        Some(rest) => Ok(Some(home_dir()?.join(rest))),
        None => Ok(None),
    }
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| WssError::ConfigInvalid("Could not determine home directory".to_string()))
}

/// Default settings file: `<config_dir>/wss/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| WssError::ConfigInvalid("Could not determine config directory".to_string()))?;
    Ok(dir.join("wss").join("config.toml"))
}
