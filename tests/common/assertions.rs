//! Assertion helpers for tests.

use engrave::rendering::{decode_png, DecodedImage};
use pretty_assertions::assert_eq;

/// Assert bytes carry the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert the PNG is a 1-bit greyscale image of the given size
pub fn assert_one_bit_png(bytes: &[u8], width: u32, height: u32) {
    assert_png(bytes);
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let reader = decoder.read_info().expect("readable PNG header");
    let info = reader.info();
    assert_eq!(info.color_type, png::ColorType::Grayscale);
    assert_eq!(info.bit_depth, png::BitDepth::One);
    assert_eq!((info.width, info.height), (width, height));
}

/// Decode and assert every pixel is opaque pure black or white
pub fn decode_monochrome(bytes: &[u8]) -> DecodedImage {
    let decoded = decode_png(bytes).expect("decodable PNG");
    for (i, px) in decoded.rgba.chunks_exact(4).enumerate() {
        assert!(
            (px[0] == 0 || px[0] == 255) && px[0] == px[1] && px[1] == px[2] && px[3] == 255,
            "pixel {i} is not monochrome: {px:?}"
        );
    }
    decoded
}

/// Count black pixels in decoded RGBA
pub fn black_count(image: &DecodedImage) -> usize {
    image.rgba.chunks_exact(4).filter(|px| px[0] == 0).count()
}
