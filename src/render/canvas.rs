//! Minimal drawing surface in layout units.
//!
//! Coordinates are CSS-like pixels; every primitive multiplies by the
//! canvas scale before touching the buffer. Text is queued as runs rather
//! than rasterised.

use image::{Rgba, RgbaImage, imageops};

use crate::palette::HexColor;
use crate::raster::{FontWeight, TextRun};

/// Approximate Helvetica advance width per em.
const HELVETICA_CHAR_WIDTH_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TextStyle {
    pub size: f64,
    pub color: HexColor,
    pub weight: FontWeight,
}

impl TextStyle {
    /// Estimated width of `text` in layout units.
    pub(crate) fn width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.size * HELVETICA_CHAR_WIDTH_RATIO
    }
}

pub(crate) struct Canvas {
    image: RgbaImage,
    scale: u32,
    text: Vec<TextRun>,
}

pub(crate) fn rgba(color: HexColor) -> Rgba<u8> {
    let [r, g, b] = color.rgb();
    Rgba([r, g, b, 255])
}

impl Canvas {
    /// A white canvas of `width` x `height` layout units.
    pub(crate) fn new(width: u32, height: u32, scale: u32) -> Self {
        let image = RgbaImage::from_pixel(width * scale, height * scale, rgba(HexColor::WHITE));
        Self {
            image,
            scale,
            text: Vec::new(),
        }
    }

    pub(crate) fn scale(&self) -> u32 {
        self.scale
    }

    pub(crate) fn into_parts(self) -> (RgbaImage, Vec<TextRun>) {
        (self.image, self.text)
    }

    /// Queue one line of text with its left edge at `x`.
    pub(crate) fn text(&mut self, x: f64, baseline: f64, style: TextStyle, text: &str) {
        let s = f64::from(self.scale);
        self.text.push(TextRun {
            x: x * s,
            baseline: baseline * s,
            size: style.size * s,
            color: style.color,
            weight: style.weight,
            text: text.to_string(),
        });
    }

    /// Queue one line of text centred on `centre_x`.
    pub(crate) fn text_centred(&mut self, centre_x: f64, baseline: f64, style: TextStyle, text: &str) {
        self.text(centre_x - style.width(text) / 2.0, baseline, style, text);
    }

    /// Fill a rectangle, clipped to the canvas.
    pub(crate) fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: HexColor) {
        let s = self.scale;
        let x1 = ((x + width) * s).min(self.image.width());
        let y1 = ((y + height) * s).min(self.image.height());
        let px = rgba(color);
        for py in (y * s).min(y1)..y1 {
            for qx in (x * s).min(x1)..x1 {
                self.image.put_pixel(qx, py, px);
            }
        }
    }

    /// Outline a rectangle with a border `thickness` units wide.
    pub(crate) fn stroke_rect(&mut self, x: u32, y: u32, width: u32, height: u32, thickness: u32, color: HexColor) {
        let t = thickness.min(width / 2).min(height / 2);
        self.fill_rect(x, y, width, t, color);
        self.fill_rect(x, y + height - t, width, t, color);
        self.fill_rect(x, y, t, height, color);
        self.fill_rect(x + width - t, y, t, height, color);
    }

    /// A filled disc of `diameter` units with a ring `ring` units wide.
    pub(crate) fn ringed_disc(&mut self, x: u32, y: u32, diameter: u32, ring: u32, fill: HexColor, ring_color: HexColor) {
        let s = f64::from(self.scale);
        let outer = f64::from(diameter) * s / 2.0;
        let inner = outer - f64::from(ring) * s;
        let cx = f64::from(x) * s + outer;
        let cy = f64::from(y) * s + outer;

        let fill = rgba(fill);
        let ring_color = rgba(ring_color);
        let x0 = x * self.scale;
        let y0 = y * self.scale;
        let size = diameter * self.scale;
        for py in y0..(y0 + size).min(self.image.height()) {
            for px in x0..(x0 + size).min(self.image.width()) {
                let dx = f64::from(px) + 0.5 - cx;
                let dy = f64::from(py) + 0.5 - cy;
                let d = dx.hypot(dy);
                if d <= inner {
                    self.image.put_pixel(px, py, fill);
                } else if d <= outer {
                    self.image.put_pixel(px, py, ring_color);
                }
            }
        }
    }

    /// Paste an already-scaled bitmap at layout position (`x`, `y`).
    pub(crate) fn paste(&mut self, x: u32, y: u32, bitmap: &RgbaImage) {
        imageops::overlay(
            &mut self.image,
            bitmap,
            i64::from(x * self.scale),
            i64::from(y * self.scale),
        );
    }
}
