//! Error types for palette planning and export operations.

use thiserror::Error;

/// Primary error type for `wss` operations.
#[derive(Error, Debug)]
pub enum WssError {
    // Input validation
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    // Palette errors
    #[error("Invalid color '{value}': expected 6 hex digits (e.g., #93c5fd)")]
    InvalidColor { value: String },

    #[error("Color not found: {id}")]
    ColorNotFound { id: String },

    #[error("Color {id} already has {max} reference images")]
    ImageLimit { id: String, max: usize },

    #[error("No reference image matching '{prefix}' on color {id}")]
    ImageNotAttached { id: String, prefix: String },

    #[error("Image prefix '{prefix}' is ambiguous on color {id}")]
    AmbiguousImage { id: String, prefix: String },

    // History errors
    #[error("Palette not found in history: {id}")]
    PaletteNotFound { id: i64 },

    #[error("Nothing to save: palette has no colors and no notes")]
    EmptyPalette,

    // Image errors
    #[error("Image file not found: {path}")]
    ImageNotFound { path: String },

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    // Document errors
    #[error("Document assembly failed: {0}")]
    Document(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Store(String),

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl WssError {
    /// Build an [`WssError::InvalidInput`] for a named field.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::InvalidColor { .. }
                | Self::ColorNotFound { .. }
                | Self::ImageLimit { .. }
                | Self::ImageNotAttached { .. }
                | Self::AmbiguousImage { .. }
                | Self::PaletteNotFound { .. }
                | Self::EmptyPalette
                | Self::ImageNotFound { .. }
                | Self::ConfigNotFound { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ColorNotFound { .. } => Some("Run: wss palette show"),
            Self::ImageLimit { .. } => Some("Detach an image first: wss palette detach <COLOR_ID> <IMAGE>"),
            Self::ImageNotAttached { .. } | Self::AmbiguousImage { .. } => {
                Some("Use a longer image fingerprint from: wss palette show")
            }
            Self::PaletteNotFound { .. } => Some("Run: wss history list"),
            Self::EmptyPalette => Some("Add a color or notes before saving"),
            Self::InvalidColor { .. } => Some("Use a value like #ff0000 or ff0000"),
            Self::ConfigNotFound { .. } => Some("Create the file or drop --config"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using WssError.
pub type Result<T> = std::result::Result<T, WssError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| WssError::Other(format!("{}: {e}", f().into())))
    }
}
