use log::{debug, error, info};
use thiserror::Error;

use super::format::{Color, Image, BMP_MAGIC, TGA_SIGNATURE};
use crate::buffer::ByteReader;
use crate::compression::{decode_rle, RleDecodeError};

/// 14-byte file header plus the 40-byte BITMAPINFOHEADER.
const BMP_HEADER_LEN: usize = 54;
const TGA_HEADER_LEN: usize = 18;
/// Image dimensions are bounded to the unsigned 16-bit range.
const MAX_DIMENSION: u32 = 65535;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("unrecognized image data: no BMP magic and no TGA footer signature")]
    UnknownFormat,
    #[error("unexpected end of data at byte {0}")]
    UnexpectedEof(usize),
    #[error("unsupported DIB header size {0}, only the 40-byte BITMAPINFOHEADER is supported")]
    UnsupportedDibHeader(u32),
    #[error("invalid image dimensions {width}x{height}, both must be in 1..=65535")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("expected 1 color plane, found {0}")]
    InvalidColorPlanes(u16),
    #[error("unsupported bit depth {0}")]
    UnsupportedBitDepth(u16),
    #[error("compressed BMP data is not supported (compression method {0})")]
    UnsupportedCompression(u32),
    #[error("paletted BMP data is not supported ({0} palette colors declared)")]
    UnexpectedPalette(u32),
    #[error("unsupported TGA color map type {0}")]
    UnsupportedColorMap(u8),
    #[error("unsupported TGA image type {0}, only truecolor (2) and RLE truecolor (10) are supported")]
    UnsupportedImageType(u8),
    #[error("unsupported TGA image descriptor {descriptor:#04x} for depth {depth}")]
    UnsupportedDescriptor { descriptor: u8, depth: u8 },
    #[error("RLE decoding failed")]
    Rle(#[from] RleDecodeError),
}

/// Decodes an image from raw file bytes, sniffing the container format:
/// the BMP magic at offset 0 is checked first, then the TGA footer
/// signature in the last 18 bytes.
pub fn decode(data: &[u8]) -> Result<Image, DecodeError> {
    let reader = ByteReader::new(data.to_vec(), true);

    if reader.compare(0, &BMP_MAGIC) {
        debug!("BMP magic found, decoding as BMP");
        decode_bmp(reader)
    } else if data.len() >= TGA_SIGNATURE.len()
        && reader.compare(data.len() - TGA_SIGNATURE.len(), TGA_SIGNATURE)
    {
        debug!("TGA footer signature found, decoding as TGA");
        decode_tga(reader)
    } else {
        error!("Image data matches no supported format");
        Err(DecodeError::UnknownFormat)
    }
}

fn decode_bmp(mut data: ByteReader) -> Result<Image, DecodeError> {
    if data.len() < BMP_HEADER_LEN {
        return Err(DecodeError::UnexpectedEof(data.len()));
    }

    // File header
    data.advance(2 + 4 + 4); // magic, file size, application specific
    let pixel_offset = data.read_u32() as usize;

    // DIB header, validated field by field
    let dib_size = data.read_u32();
    if dib_size != 40 {
        return Err(DecodeError::UnsupportedDibHeader(dib_size));
    }
    let width = data.read_u32();
    let raw_height = data.read_i32();
    let height = raw_height.unsigned_abs();
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(DecodeError::InvalidDimensions { width, height });
    }
    let planes = data.read_u16();
    if planes != 1 {
        return Err(DecodeError::InvalidColorPlanes(planes));
    }
    let bit_depth = data.read_u16();
    if bit_depth != 24 {
        return Err(DecodeError::UnsupportedBitDepth(bit_depth));
    }
    let compression = data.read_u32();
    if compression != 0 {
        return Err(DecodeError::UnsupportedCompression(compression));
    }
    data.advance(4); // pixel array size, unreliable, a value of 0 is not uncommon
    data.advance(4 + 4); // X/Y resolution
    let palette_colors = data.read_u32();
    if palette_colors != 0 {
        return Err(DecodeError::UnexpectedPalette(palette_colors));
    }
    let important_colors = data.read_u32();
    if important_colors != 0 {
        return Err(DecodeError::UnexpectedPalette(important_colors));
    }
    debug!(
        "BMP header validated: {}x{}, raw height {}, pixel offset {}",
        width, height, raw_height, pixel_offset
    );

    // Pixel data: BGR triples, each scanline padded to a 4-byte multiple,
    // stored bottom-to-top unless the raw height was negative.
    let padding = (width as usize * 3) % 4;
    let row_len = width as usize * 3 + padding;
    if pixel_offset + row_len * height as usize > data.len() {
        return Err(DecodeError::UnexpectedEof(data.len()));
    }
    data.seek(pixel_offset);

    let mut image = Image::filled(width as u16, height as u16, Color::default());
    for file_row in 0..height as u16 {
        let y = if raw_height > 0 {
            height as u16 - 1 - file_row
        } else {
            file_row
        };
        for x in 0..width as u16 {
            let b = data.read_u8();
            let g = data.read_u8();
            let r = data.read_u8();
            image.set_pixel(x, y, Color::rgb(r, g, b));
        }
        data.advance(padding);
    }

    info!("Decoded {}x{} BMP image", width, height);
    Ok(image)
}

fn decode_tga(mut data: ByteReader) -> Result<Image, DecodeError> {
    if data.len() < TGA_HEADER_LEN {
        return Err(DecodeError::UnexpectedEof(data.len()));
    }

    data.advance(1); // image ID length
    let color_map_type = data.read_u8();
    if color_map_type != 0 {
        return Err(DecodeError::UnsupportedColorMap(color_map_type));
    }
    let image_type = data.read_u8();
    if image_type != 2 && image_type != 10 {
        return Err(DecodeError::UnsupportedImageType(image_type));
    }
    data.advance(5); // color map specification
    data.advance(4); // X/Y origin
    let width = data.read_u16();
    let height = data.read_u16();
    let depth = data.read_u8();
    if depth != 24 && depth != 32 {
        return Err(DecodeError::UnsupportedBitDepth(depth as u16));
    }
    let bytes_per_pixel = depth as usize / 8;
    let descriptor = data.read_u8();
    // 24-bit data carries no alpha bits, 32-bit data exactly 8.
    if (depth == 24 && descriptor != 0) || (depth == 32 && descriptor != 8) {
        return Err(DecodeError::UnsupportedDescriptor { descriptor, depth });
    }
    debug!(
        "TGA header validated: {}x{}, type {}, {} bits per pixel",
        width, height, image_type, depth
    );

    let pixel_bytes = width as usize * height as usize * bytes_per_pixel;
    if image_type == 10 {
        // Expand the RLE stream in place so the pixel walk below is
        // identical to the uncompressed path.
        decode_rle(&mut data, pixel_bytes, bytes_per_pixel)?;
    } else if data.remaining() < pixel_bytes {
        return Err(DecodeError::UnexpectedEof(data.len()));
    }

    // Rows are stored bottom-to-top, pixels in BGR(A) order.
    let mut image = Image::filled(width, height, Color::default());
    for file_row in 0..height {
        let y = height - 1 - file_row;
        for x in 0..width {
            let b = data.read_u8();
            let g = data.read_u8();
            let r = data.read_u8();
            let a = if bytes_per_pixel == 4 {
                data.read_u8()
            } else {
                255
            };
            image.set_pixel(x, y, Color::rgba(r, g, b, a));
        }
    }

    info!("Decoded {}x{} TGA image", width, height);
    Ok(image)
}
