//! Reference photos attached to palette colors.
//!
//! Images are kept inline as `data:` URLs so a palette record is a single
//! self-contained JSON value.

use std::fmt;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::error::{Result, WssError};

/// Length of the short fingerprint shown to users.
pub const FINGERPRINT_LEN: usize = 12;

/// An inline image stored as a base64 `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceImage(String);

impl ReferenceImage {
    /// Build a data URL from encoded image bytes (PNG, JPEG, ...).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)
            .map_err(|e| WssError::ImageProcessing(format!("Unrecognised image data: {e}")))?;
        let mime = format.to_mime_type();
        Ok(Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes))))
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(WssError::ImageNotFound {
                path: path.display().to_string(),
            });
        }
        let bytes = std::fs::read(path)?;
        let image = Self::from_bytes(&bytes)?;
        debug!(bytes = bytes.len(), fingerprint = %image.fingerprint(), "Read reference image");
        Ok(image)
    }

    /// Wrap an existing data URL without validating the payload.
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    /// Mime type declared in the URL, if any.
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let (mime, _) = rest.split_once(';')?;
        Some(mime)
    }

    /// Raw encoded bytes of the image.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        let (_, payload) = self
            .0
            .split_once(";base64,")
            .ok_or_else(|| WssError::ImageProcessing("Reference image is not a base64 data URL".to_string()))?;
        STANDARD
            .decode(payload)
            .map_err(|e| WssError::ImageProcessing(format!("Invalid base64 payload: {e}")))
    }

    /// Decode into pixels.
    pub fn decode(&self) -> Result<DynamicImage> {
        let bytes = self.bytes()?;
        image::load_from_memory(&bytes).map_err(|e| WssError::ImageProcessing(e.to_string()))
    }

    /// Short SHA-256 fingerprint of the data URL, used to address images.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        let mut hex = hex::encode(digest);
        hex.truncate(FINGERPRINT_LEN);
        hex
    }
}

impl fmt::Display for ReferenceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.fingerprint(),
            self.mime_type().unwrap_or("unknown")
        )
    }
}
