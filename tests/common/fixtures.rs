//! Test fixture helpers for creating temporary test data.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;
use wss::palette::ReferenceImage;
use wss::raster::Snapshot;

/// A snapshot whose row `y` is painted with the gray value `y % 256`.
///
/// Lets tests check which source rows ended up in which band.
pub fn striped_snapshot(width: u32, height: u32) -> Snapshot {
    let img = RgbaImage::from_fn(width, height, |_, y| {
        let v = (y % 256) as u8;
        Rgba([v, v, v, 255])
    });
    Snapshot::new(img).expect("non-empty snapshot")
}

pub fn solid_snapshot(width: u32, height: u32, color: [u8; 3]) -> Snapshot {
    let [r, g, b] = color;
    Snapshot::new(RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]))).expect("non-empty snapshot")
}

/// PNG-encoded bytes of a solid image.
pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).expect("encode png");
    buf.into_inner()
}

pub fn reference_image(color: [u8; 3]) -> ReferenceImage {
    ReferenceImage::from_bytes(&png_bytes(40, 30, color)).expect("valid png")
}

/// Temporary directory with helpers for writing test files.
pub struct TestDir {
    pub dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a solid PNG and return its path.
    pub fn png(&self, name: &str, width: u32, height: u32, color: [u8; 3]) -> PathBuf {
        let path = self.join(name);
        std::fs::write(&path, png_bytes(width, height, color)).expect("write png");
        path
    }

    /// Write a text file and return its path.
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.join(name);
        std::fs::write(&path, content).expect("write file");
        path
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}
