use log::{debug, info};

use super::format::{Image, ImageFormat, BMP_MAGIC};
use crate::buffer::ByteWriter;
use crate::compression::encode_rle;

/// Serializes the pixel grid into the requested container format.
/// Encoding an in-memory image cannot fail; only writing the bytes out
/// can, and that belongs to [`Image::save`].
pub fn encode(image: &Image, format: ImageFormat) -> Vec<u8> {
    match format {
        ImageFormat::Bmp => encode_bmp(image),
        ImageFormat::Tga => encode_tga(image),
    }
}

fn encode_bmp(image: &Image) -> Vec<u8> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let padding = (width * 3) % 4;
    let pixel_array_len = (width * 3 + padding) * height;

    let mut data = ByteWriter::new(true);

    // File header
    data.write_bytes(&BMP_MAGIC);
    data.write_u32((pixel_array_len + 54) as u32);
    data.pad(4); // application specific
    data.write_u32(54); // pixel data offset

    // BITMAPINFOHEADER
    data.write_u32(40);
    data.write_u32(width as u32);
    data.write_u32(height as u32); // positive height: rows bottom-to-top
    data.write_u16(1); // color planes
    data.write_u16(24); // bits per pixel
    data.write_u32(0); // no compression
    data.write_u32(pixel_array_len as u32);
    data.pad(4 + 4); // X/Y resolution
    data.write_u32(0); // palette colors
    data.write_u32(0); // important colors
    debug!("BMP header written: {}x{}, {} pixel bytes", width, height, pixel_array_len);

    // Pixel array: BGR triples, bottom row first, padded scanlines.
    for y in (0..image.height()).rev() {
        for x in 0..image.width() {
            let color = image.pixel(x, y);
            data.write_u8(color.b);
            data.write_u8(color.g);
            data.write_u8(color.r);
        }
        data.pad(padding);
    }

    info!("Encoded {}x{} image as BMP ({} bytes)", width, height, data.len());
    data.into_bytes()
}

fn encode_tga(image: &Image) -> Vec<u8> {
    let mut data = ByteWriter::new(true);

    // Header: always RLE truecolor, 24 bits, no alpha.
    data.write_u8(0); // image ID length
    data.write_u8(0); // no color map
    data.write_u8(10); // RLE-compressed truecolor
    data.pad(5); // color map specification
    data.pad(4); // X/Y origin
    data.write_u16(image.width());
    data.write_u16(image.height());
    data.write_u8(24); // bits per pixel
    data.write_u8(0); // descriptor: no alpha bits, bottom-left origin

    // Flatten bottom-to-top into BGR triples, then compress.
    let width = image.width() as usize;
    let height = image.height() as usize;
    let mut pixel_bytes = Vec::with_capacity(width * height * 3);
    for y in (0..image.height()).rev() {
        for x in 0..image.width() {
            let color = image.pixel(x, y);
            pixel_bytes.push(color.b);
            pixel_bytes.push(color.g);
            pixel_bytes.push(color.r);
        }
    }
    encode_rle(&mut data, &pixel_bytes, image.width(), 3);
    debug!(
        "TGA pixel data compressed: {} raw bytes -> {} encoded bytes",
        pixel_bytes.len(),
        data.len() - 18
    );

    // Footer: zero extension and developer area offsets, then the
    // trailing signature the decoder sniffs for.
    data.write_u32(0);
    data.write_u32(0);
    data.write_str("TRUEVISION-XFILE.");

    info!("Encoded {}x{} image as TGA ({} bytes)", width, height, data.len());
    data.into_bytes()
}
