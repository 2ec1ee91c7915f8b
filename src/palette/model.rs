//! The working palette and its value-replacing edit operations.
//!
//! Every edit returns a new [`Palette`]; the receiver is never mutated.
//! Callers replace their copy with the result, which keeps undo and
//! persistence trivial.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use super::color::{self, HexColor};
use super::image_ref::ReferenceImage;
use crate::error::{Result, WssError};

/// Maximum reference images per color.
pub const MAX_IMAGES_PER_COLOR: usize = 3;

/// Colors every new palette starts with.
pub const DEFAULT_COLORS: [(&str, HexColor); 5] = [
    ("color-1", HexColor::new(0x93, 0xc5, 0xfd)),
    ("color-2", HexColor::new(0xfd, 0xe0, 0x47)),
    ("color-3", HexColor::new(0x34, 0xd3, 0x99)),
    ("color-4", HexColor::new(0xfc, 0xa5, 0xa5)),
    ("color-5", HexColor::new(0xc0, 0x84, 0xfc)),
];

/// One color in a palette with its reference photos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// `None` when the color was left blank.
    #[serde(with = "color::optional")]
    pub color: Option<HexColor>,
    #[serde(default)]
    pub images: Vec<ReferenceImage>,
}

impl ColorEntry {
    pub fn new(id: impl Into<String>, color: HexColor) -> Self {
        Self {
            id: id.into(),
            color: Some(color),
            images: Vec::new(),
        }
    }

    /// The single distinct image whose fingerprint starts with `prefix`.
    fn find_image(&self, prefix: &str) -> Result<&ReferenceImage> {
        let prefix = prefix.trim().to_ascii_lowercase();
        let mut matches = self
            .images
            .iter()
            .filter(|img| !prefix.is_empty() && img.fingerprint().starts_with(&prefix));

        let first = matches.next().ok_or_else(|| WssError::ImageNotAttached {
            id: self.id.clone(),
            prefix: prefix.clone(),
        })?;
        if matches.any(|other| other != first) {
            return Err(WssError::AmbiguousImage {
                id: self.id.clone(),
                prefix,
            });
        }
        Ok(first)
    }
}

/// Old records stored numeric ids for added colors.
fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// The palette being edited: ordered colors plus free-form notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<ColorEntry>,
    #[serde(default)]
    pub notes: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS
                .iter()
                .map(|(id, color)| ColorEntry::new(*id, *color))
                .collect(),
            notes: String::new(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<ColorEntry>, notes: impl Into<String>) -> Self {
        Self {
            colors,
            notes: notes.into(),
        }
    }

    /// The starting palette.
    pub fn reset() -> Self {
        debug!("Palette reset to defaults");
        Self::default()
    }

    pub fn color(&self, id: &str) -> Option<&ColorEntry> {
        self.colors.iter().find(|c| c.id == id)
    }

    /// All reference images across colors, in palette order.
    pub fn images(&self) -> impl Iterator<Item = &ReferenceImage> {
        self.colors.iter().flat_map(|c| c.images.iter())
    }

    pub fn image_count(&self) -> usize {
        self.colors.iter().map(|c| c.images.len()).sum()
    }

    /// True when there is nothing worth saving.
    pub fn is_blank(&self) -> bool {
        self.colors.iter().all(|c| c.color.is_none()) && self.notes.trim().is_empty()
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.colors
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| WssError::ColorNotFound { id: id.to_string() })
    }

    fn fresh_id(&self) -> String {
        loop {
            let simple = Uuid::new_v4().simple().to_string();
            let id = format!("color-{}", &simple[..8]);
            if self.color(&id).is_none() {
                return id;
            }
        }
    }

    /// Copy with `f` applied to the color at `index`.
    fn replacing(&self, index: usize, f: impl FnOnce(&ColorEntry) -> ColorEntry) -> Self {
        let mut colors = self.colors.clone();
        colors[index] = f(&self.colors[index]);
        Self {
            colors,
            notes: self.notes.clone(),
        }
    }

    /// Append a white color with a fresh id.
    pub fn with_color_added(&self) -> Self {
        let entry = ColorEntry::new(self.fresh_id(), HexColor::WHITE);
        debug!(id = %entry.id, "Adding color");
        let mut colors = self.colors.clone();
        colors.push(entry);
        Self {
            colors,
            notes: self.notes.clone(),
        }
    }

    pub fn with_color_removed(&self, id: &str) -> Result<Self> {
        self.require(id)?;
        debug!(id, "Removing color");
        Ok(Self {
            colors: self.colors.iter().filter(|c| c.id != id).cloned().collect(),
            notes: self.notes.clone(),
        })
    }

    pub fn with_color_changed(&self, id: &str, color: HexColor) -> Result<Self> {
        let index = self.require(id)?;
        trace!(id, %color, "Changing color");
        Ok(self.replacing(index, |entry| ColorEntry {
            color: Some(color),
            ..entry.clone()
        }))
    }

    /// Attach a photo; a color holds at most [`MAX_IMAGES_PER_COLOR`].
    pub fn with_image_attached(&self, id: &str, image: ReferenceImage) -> Result<Self> {
        let index = self.require(id)?;
        if self.colors[index].images.len() >= MAX_IMAGES_PER_COLOR {
            return Err(WssError::ImageLimit {
                id: id.to_string(),
                max: MAX_IMAGES_PER_COLOR,
            });
        }
        debug!(id, fingerprint = %image.fingerprint(), "Attaching image");
        Ok(self.replacing(index, |entry| {
            let mut images = entry.images.clone();
            images.push(image);
            ColorEntry {
                images,
                ..entry.clone()
            }
        }))
    }

    /// Remove the image whose fingerprint starts with `prefix`, along with
    /// any identical copies on the same color.
    pub fn with_image_removed(&self, id: &str, prefix: &str) -> Result<Self> {
        let index = self.require(id)?;
        let target = self.colors[index].find_image(prefix)?.clone();
        debug!(id, fingerprint = %target.fingerprint(), "Removing image");
        Ok(self.replacing(index, |entry| ColorEntry {
            images: entry.images.iter().filter(|img| **img != target).cloned().collect(),
            ..entry.clone()
        }))
    }

    pub fn with_notes(&self, notes: impl Into<String>) -> Self {
        Self {
            colors: self.colors.clone(),
            notes: notes.into(),
        }
    }

    /// Copy without blank colors, as stored in history.
    pub fn without_blank_colors(&self) -> Self {
        Self {
            colors: self.colors.iter().filter(|c| c.color.is_some()).cloned().collect(),
            notes: self.notes.clone(),
        }
    }
}
