//! Palette model: colors, reference photos and notes.
//!
//! Handles the palette being edited. Saved palettes live in
//! [`history`](crate::history).

mod color;
mod image_ref;
mod model;

pub use color::HexColor;
pub use image_ref::{FINGERPRINT_LEN, ReferenceImage};
pub use model::{ColorEntry, DEFAULT_COLORS, MAX_IMAGES_PER_COLOR, Palette};
