use std::fs;
use std::io;
use std::path::Path;

use log::info;
use thiserror::Error;

use super::decoder::{decode, DecodeError};
use super::encoder::encode;

pub const BMP_MAGIC: [u8; 2] = *b"BM";
/// Trailing TGA footer signature, NUL terminator included. Presence of
/// these 18 bytes at the end of a file is the TGA-format signal; the
/// format has no magic number at offset 0.
pub const TGA_SIGNATURE: &[u8; 18] = b"TRUEVISION-XFILE.\0";

/// An RGBA color with 8 bits per channel. The default value
/// (transparent black) doubles as the out-of-bounds sentinel returned
/// by [`Image::pixel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Bmp,
    Tga,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read image file")]
    Io(#[from] io::Error),
    #[error("failed to decode image data")]
    Decode(#[from] DecodeError),
}

/// A width x height grid of [`Color`] values in row-major order with a
/// top-left origin, regardless of the row order of the file it came
/// from. Owns its pixel storage exclusively; deliberately not `Clone`.
#[derive(Debug, Default)]
pub struct Image {
    width: u16,
    height: u16,
    pixels: Vec<Color>,
}

impl Image {
    /// The empty state: no dimensions, no pixel storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid-fill constructor.
    pub fn filled(width: u16, height: u16, background: Color) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![background; count],
        }
    }

    /// Builds an image from interleaved RGBA8 bytes, top-left origin.
    /// Missing pixels are filled with the sentinel color; excess input
    /// is ignored.
    pub fn from_rgba(width: u16, height: u16, rgba: &[u8]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count);
        for px in rgba.chunks_exact(4).take(count) {
            pixels.push(Color::rgba(px[0], px[1], px[2], px[3]));
        }
        pixels.resize(count, Color::default());
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// The row-major RGBA8 pixel grid, as consumed by texture upload.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Returns the pixel at (x, y), or the sentinel color when the
    /// coordinates are out of range.
    pub fn pixel(&self, x: u16, y: u16) -> Color {
        if x >= self.width || y >= self.height {
            return Color::default();
        }
        self.pixels[x as usize + y as usize * self.width as usize]
    }

    /// Sets the pixel at (x, y); out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[x as usize + y as usize * self.width as usize] = color;
    }

    /// Reads and decodes an image file. The image is only constructed
    /// after the whole file decodes successfully, so a failed load never
    /// yields a partially-decoded image.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Image, LoadError> {
        let data = fs::read(&path)?;
        let image = decode(&data)?;
        info!(
            "Loaded {}x{} image from {}",
            image.width,
            image.height,
            path.as_ref().display()
        );
        Ok(image)
    }

    /// Encodes the pixel grid and writes it out in a single bulk write.
    pub fn save<P: AsRef<Path>>(&self, path: P, format: ImageFormat) -> io::Result<()> {
        fs::write(&path, encode(self, format))?;
        info!(
            "Saved {}x{} image to {}",
            self.width,
            self.height,
            path.as_ref().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_out_of_bounds_returns_sentinel() {
        let image = Image::filled(2, 2, Color::rgb(50, 60, 70));
        assert_eq!(image.pixel(2, 0), Color::default());
        assert_eq!(image.pixel(0, 2), Color::default());
        assert_eq!(image.pixel(1, 1), Color::rgb(50, 60, 70));
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_ignored() {
        let mut image = Image::filled(2, 2, Color::default());
        image.set_pixel(5, 5, Color::rgb(1, 2, 3));
        assert!(image.pixels().iter().all(|&p| p == Color::default()));

        image.set_pixel(1, 0, Color::rgb(1, 2, 3));
        assert_eq!(image.pixel(1, 0), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_empty_image_state() {
        let image = Image::new();
        assert_eq!(image.width(), 0);
        assert_eq!(image.height(), 0);
        assert!(image.pixels().is_empty());
        assert_eq!(image.pixel(0, 0), Color::default());
    }

    #[test]
    fn test_from_rgba() {
        let image = Image::from_rgba(2, 1, &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(image.pixel(0, 0), Color::rgba(1, 2, 3, 4));
        assert_eq!(image.pixel(1, 0), Color::rgba(5, 6, 7, 8));
    }

    #[test]
    fn test_from_rgba_short_input_pads_with_sentinel() {
        let image = Image::from_rgba(2, 1, &[1, 2, 3, 4]);
        assert_eq!(image.pixel(0, 0), Color::rgba(1, 2, 3, 4));
        assert_eq!(image.pixel(1, 0), Color::default());
    }
}
