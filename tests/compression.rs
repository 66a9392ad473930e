use lib_raster::buffer::{ByteReader, ByteWriter};
use lib_raster::compression::{decode_rle, encode_rle};

fn roundtrip(pixels: &[u8], width: u16, bytes_per_pixel: usize) -> Vec<u8> {
    let mut writer = ByteWriter::new(true);
    encode_rle(&mut writer, pixels, width, bytes_per_pixel);

    let mut reader = ByteReader::new(writer.into_bytes(), true);
    decode_rle(&mut reader, pixels.len(), bytes_per_pixel).unwrap();

    let mut decoded = vec![0u8; pixels.len()];
    reader.read_into(&mut decoded);
    decoded
}

#[test]
fn test_rle_roundtrip_solid_run() {
    let pixels = [200u8, 100, 50].repeat(64);
    let encoded_len = {
        let mut writer = ByteWriter::new(true);
        encode_rle(&mut writer, &pixels, 64, 3);
        writer.len()
    };

    // A single run packet: header plus one pixel value.
    assert_eq!(encoded_len, 4);
    assert_eq!(roundtrip(&pixels, 64, 3), pixels);
}

#[test]
fn test_rle_roundtrip_all_distinct() {
    let mut pixels = Vec::new();
    for i in 0..96u8 {
        pixels.extend_from_slice(&[i, i.wrapping_mul(3), 255 - i]);
    }
    assert_eq!(roundtrip(&pixels, 96, 3), pixels);
}

#[test]
fn test_rle_roundtrip_mixed_pattern() {
    // Literals, a long run, more literals, a short run.
    let mut pixels = Vec::new();
    pixels.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
    pixels.extend_from_slice(&[7u8, 7, 7].repeat(20));
    pixels.extend_from_slice(&[8, 9, 10, 11, 12, 13, 14, 15, 16]);
    pixels.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    let width = (pixels.len() / 3) as u16;
    assert_eq!(roundtrip(&pixels, width, 3), pixels);
}

#[test]
fn test_rle_roundtrip_past_packet_cap() {
    // 300 identical pixels on one scanline force run packets at the
    // 128-pixel cap: 128 + 128 + 44.
    let pixels = [42u8, 42, 42].repeat(300);
    let encoded = {
        let mut writer = ByteWriter::new(true);
        encode_rle(&mut writer, &pixels, 300, 3);
        writer.into_bytes()
    };
    assert_eq!(encoded.len(), 3 * 4);
    assert_eq!(encoded[0], 0xFF);
    assert_eq!(encoded[4], 0xFF);
    assert_eq!(encoded[8], 0x80 | 43);

    assert_eq!(roundtrip(&pixels, 300, 3), pixels);
}

#[test]
fn test_rle_run_never_spans_scanlines() {
    // A 10-pixel run over 4-pixel scanlines: packets of 4, 4 and 2.
    let pixels = [9u8, 9, 9].repeat(10);
    let encoded = {
        let mut writer = ByteWriter::new(true);
        encode_rle(&mut writer, &pixels, 4, 3);
        writer.into_bytes()
    };
    assert_eq!(
        encoded,
        vec![0x83, 9, 9, 9, 0x83, 9, 9, 9, 0x81, 9, 9, 9]
    );

    assert_eq!(roundtrip(&pixels, 4, 3), pixels);
}

#[test]
fn test_rle_roundtrip_four_byte_pixels() {
    let mut pixels = [10u8, 20, 30, 255].repeat(12);
    pixels.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    let width = (pixels.len() / 4) as u16;
    assert_eq!(roundtrip(&pixels, width, 4), pixels);
}

#[test]
fn test_rle_roundtrip_empty() {
    assert!(roundtrip(&[], 4, 3).is_empty());
}
