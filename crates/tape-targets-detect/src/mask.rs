//! Colour masking in the 8-bit HSV convention used by OpenCV.
//!
//! Hue is halved to fit a byte (`0..=179`); saturation and value span
//! `0..=255`. Ranges are inclusive on both ends, per channel.

use image::{GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};

pub const MASK_ON: u8 = 255;

/// Inclusive HSV bounds describing the target colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub low: [u8; 3],
    pub high: [u8; 3],
}

impl Default for ColorRange {
    /// Green LED ring reflected by the tape.
    fn default() -> Self {
        Self {
            low: [60, 100, 20],
            high: [80, 255, 255],
        }
    }
}

impl ColorRange {
    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.low[c] <= hsv[c] && hsv[c] <= self.high[c])
    }
}

/// Convert one RGB pixel to `[h, s, v]`.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(i32::from);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v == 0 {
        0
    } else {
        (255 * diff + v / 2) / v
    };

    let h = if diff == 0 {
        0.0
    } else {
        let d = diff as f32;
        let deg = if v == r {
            60.0 * (g - b) as f32 / d
        } else if v == g {
            120.0 + 60.0 * (b - r) as f32 / d
        } else {
            240.0 + 60.0 * (r - g) as f32 / d
        };
        if deg < 0.0 {
            deg + 360.0
        } else {
            deg
        }
    };
    let h = ((h / 2.0).round() as i32) % 180;

    [h as u8, s as u8, v as u8]
}

/// Binary mask of the pixels whose HSV value falls inside `range`.
///
/// An all-zero mask is a valid result.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(frame), fields(width = frame.width(), height = frame.height()))
)]
pub fn classify(frame: &RgbImage, range: &ColorRange) -> GrayImage {
    let mut mask = GrayImage::new(frame.width(), frame.height());
    for (dst, src) in mask.pixels_mut().zip(frame.pixels()) {
        if range.contains(rgb_to_hsv(src.0)) {
            *dst = Luma([MASK_ON]);
        }
    }
    mask
}
