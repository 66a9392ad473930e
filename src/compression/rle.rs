use crate::buffer::{ByteReader, ByteWriter};
use thiserror::Error;

/// Maximum number of pixels a single TGA packet can describe.
const MAX_PACKET_PIXELS: usize = 128;

#[derive(Error, Debug)]
pub enum RleDecodeError {
    #[error("unexpected end of compressed stream at byte {0}")]
    UnexpectedEof(usize),
    #[error("packet of {pixels} pixels overruns the expected {expected} decoded bytes")]
    PacketOverrun { pixels: usize, expected: usize },
}

/// Expands a TGA RLE pixel stream in place.
///
/// Each packet starts with a header byte: high bit set means a run packet
/// (one pixel value repeated `(header & 0x7F) + 1` times), high bit clear
/// means a raw packet (`(header & 0x7F) + 1` literal pixel values).
///
/// Reads packets from the reader's cursor until exactly `decoded_len`
/// bytes have accumulated, then swaps the expanded stream into the reader
/// with the cursor reset, so callers can walk pixels as if the data had
/// never been compressed.
pub fn decode_rle(
    reader: &mut ByteReader,
    decoded_len: usize,
    bytes_per_pixel: usize,
) -> Result<(), RleDecodeError> {
    let mut decoded: Vec<u8> = Vec::with_capacity(decoded_len);

    while decoded.len() < decoded_len {
        if reader.remaining() < 1 {
            return Err(RleDecodeError::UnexpectedEof(reader.position()));
        }
        let header = reader.read_u8();
        let pixels = ((header & 0x7F) as usize) + 1;
        let byte_count = pixels * bytes_per_pixel;

        if decoded.len() + byte_count > decoded_len {
            return Err(RleDecodeError::PacketOverrun {
                pixels,
                expected: decoded_len,
            });
        }

        if header & 0x80 != 0 {
            // Run packet: a single pixel value, replicated.
            if reader.remaining() < bytes_per_pixel {
                return Err(RleDecodeError::UnexpectedEof(reader.position()));
            }
            let mut value = [0u8; 4];
            reader.read_into(&mut value[..bytes_per_pixel]);
            for _ in 0..pixels {
                decoded.extend_from_slice(&value[..bytes_per_pixel]);
            }
        } else {
            // Raw packet: literal pixel values, copied verbatim.
            if reader.remaining() < byte_count {
                return Err(RleDecodeError::UnexpectedEof(reader.position()));
            }
            let start = decoded.len();
            decoded.resize(start + byte_count, 0);
            reader.read_into(&mut decoded[start..]);
        }
    }

    reader.replace(decoded);
    Ok(())
}

/// Compresses a flattened pixel stream into TGA RLE packets.
///
/// Greedy single pass: pixels accumulate in a backlog that is either
/// collecting literals or extending a run of one repeated value. A repeat
/// while collecting literals flushes the pending literals (keeping the
/// trailing pixel to seed the run) and switches to run mode; a mismatch
/// while running flushes the run and switches back. The backlog is also
/// force-flushed at the 128-pixel packet cap and at every scanline
/// boundary, since packets may not span scanlines.
///
/// Not an optimal encoder (no lookahead across mode switches), but every
/// stream it produces decodes back to its input.
pub fn encode_rle(writer: &mut ByteWriter, pixels: &[u8], width: u16, bytes_per_pixel: usize) {
    let bpp = bytes_per_pixel;
    let width = width as usize;
    let pixel_count = pixels.len() / bpp;

    let mut backlog: Vec<u8> = Vec::with_capacity(MAX_PACKET_PIXELS * bpp);
    let mut rle = false;

    for i in 0..pixel_count {
        let pixel = &pixels[i * bpp..(i + 1) * bpp];

        if !backlog.is_empty() && (i % width == 0 || backlog.len() == MAX_PACKET_PIXELS * bpp) {
            flush_packet(writer, &backlog, rle, bpp);
            backlog.clear();
            rle = false;
        }

        if !rle && backlog.len() >= bpp && pixel == &backlog[backlog.len() - bpp..] {
            // Entering run mode: flush pending literals, keeping the
            // trailing pixel as the start of the run.
            if backlog.len() > bpp {
                flush_packet(writer, &backlog[..backlog.len() - bpp], false, bpp);
            }
            backlog.drain(..backlog.len() - bpp);
            rle = true;
        } else if rle && pixel != &backlog[backlog.len() - bpp..] {
            flush_packet(writer, &backlog, true, bpp);
            backlog.clear();
            rle = false;
        }

        backlog.extend_from_slice(pixel);
    }

    if !backlog.is_empty() {
        flush_packet(writer, &backlog, rle, bpp);
    }
}

fn flush_packet(writer: &mut ByteWriter, backlog: &[u8], rle: bool, bytes_per_pixel: usize) {
    let pixels = backlog.len() / bytes_per_pixel;
    if rle {
        writer.write_u8(0x80 | (pixels - 1) as u8);
        writer.write_bytes(&backlog[..bytes_per_pixel]);
    } else {
        writer.write_u8((pixels - 1) as u8);
        writer.write_bytes(backlog);
    }
}
