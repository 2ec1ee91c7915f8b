//! Fitting reference photos into fixed-size tiles.

use clap::ValueEnum;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// How a photo is fitted into its tile.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeStrategy {
    /// Fill the tile, keep aspect ratio, crop the overflow.
    #[default]
    Fill,
    /// Fit inside the tile, keep aspect ratio, pad with white.
    Fit,
    /// Stretch to the tile (may distort).
    Stretch,
}

/// Resize `img` to exactly `width` x `height` pixels.
pub fn resize_to_tile(img: &DynamicImage, width: u32, height: u32, strategy: ResizeStrategy) -> RgbaImage {
    let width = width.max(1);
    let height = height.max(1);
    let filter = FilterType::Lanczos3;

    match strategy {
        ResizeStrategy::Fill => img.resize_to_fill(width, height, filter).to_rgba8(),
        ResizeStrategy::Fit => {
            let resized = img.resize(width, height, filter).to_rgba8();
            let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
            let (rw, rh) = resized.dimensions();
            let x = (width - rw) / 2;
            let y = (height - rh) / 2;
            imageops::overlay(&mut canvas, &resized, x.into(), y.into());
            canvas
        }
        ResizeStrategy::Stretch => img.resize_exact(width, height, filter).to_rgba8(),
    }
}
