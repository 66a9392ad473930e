#![allow(dead_code)]

use lib_raster::{Color, Image};

/// Two-color checkerboard, useful for exercising raw/run packet
/// switching and scanline padding.
pub fn checkerboard(width: u16, height: u16, a: Color, b: Color) -> Image {
    let mut image = Image::filled(width, height, a);
    for y in 0..height {
        for x in 0..width {
            if (x + y) % 2 == 1 {
                image.set_pixel(x, y, b);
            }
        }
    }
    image
}

/// Deterministic per-pixel "noise" with full-opacity alpha. Adjacent
/// pixels are almost never equal, which keeps the RLE encoder in raw
/// mode.
pub fn noise(width: u16, height: u16) -> Image {
    let mut image = Image::filled(width, height, Color::default());
    let mut state: u32 = 0x9E37_79B9;
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            image.set_pixel(x, y, Color::rgb(r, g, b));
        }
    }
    image
}

/// Horizontal gradient: long runs within rows are impossible, runs
/// across rows are split by the scanline rule.
pub fn gradient(width: u16, height: u16) -> Image {
    let mut image = Image::filled(width, height, Color::default());
    for y in 0..height {
        for x in 0..width {
            let v = (x as u32 * 255 / width.max(1) as u32) as u8;
            image.set_pixel(x, y, Color::rgb(v, v, v));
        }
    }
    image
}

pub fn assert_images_equal(a: &Image, b: &Image) {
    assert_eq!(a.width(), b.width());
    assert_eq!(a.height(), b.height());
    assert_eq!(a.pixels(), b.pixels());
}
