//! Synthetic frames with green tape strips on a dark background.

#![allow(dead_code)]

use image::{Rgb, RgbImage};

pub const WIDTH: u32 = 480;
pub const HEIGHT: u32 = 360;
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

/// Inclusive pixel rectangle `[x0, y0, x1, y1]`.
pub type PixelRect = [u32; 4];

pub fn blank() -> RgbImage {
    RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([12, 10, 18]))
}

pub fn paint(frame: &mut RgbImage, [x0, y0, x1, y1]: PixelRect, color: Rgb<u8>) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            frame.put_pixel(x, y, color);
        }
    }
}

pub fn frame_with(strips: &[PixelRect]) -> RgbImage {
    let mut frame = blank();
    for &strip in strips {
        paint(&mut frame, strip, GREEN);
    }
    frame
}

/// Two 40x100 strips 165 px apart, shifted right by `dx`.
pub fn target_pair(dx: u32) -> [PixelRect; 2] {
    [
        [100 + dx, 100, 140 + dx, 200],
        [265 + dx, 100, 305 + dx, 200],
    ]
}

/// Same pair with the right strip cut by a horizontal obstacle.
pub fn split_pair(dx: u32) -> [PixelRect; 3] {
    [
        [100 + dx, 100, 140 + dx, 200],
        [265 + dx, 100, 305 + dx, 145],
        [265 + dx, 156, 305 + dx, 200],
    ]
}
