use std::io::Cursor;

use laser_dither::MonoImage;

use crate::error::RenderError;

/// An 8-bit RGBA image decoded from a PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode any PNG into opaque 8-bit RGBA.
///
/// Palette and low bit depth images are expanded, 16-bit samples are
/// stripped to 8, and every colour type is widened to RGBA. Transparent
/// pixels are composited onto white so they stay unburnt; the processor
/// itself ignores alpha.
pub fn decode_png(bytes: &[u8]) -> Result<DecodedImage, RenderError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| RenderError::Decode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| RenderError::Decode(e.to_string()))?;
    buf.truncate(frame.buffer_size());

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(RenderError::UnsupportedPng(format!(
            "bit depth {:?} after expansion",
            frame.bit_depth
        )));
    }

    let rgba: Vec<u8> = match frame.color_type {
        png::ColorType::Rgba => buf
            .chunks_exact(4)
            .flat_map(|px| over_white(px[0], px[1], px[2], px[3]))
            .collect(),
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|px| over_white(px[0], px[0], px[0], px[1]))
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(RenderError::UnsupportedPng(
                "indexed colour survived expansion".to_string(),
            ))
        }
    };

    tracing::debug!(
        width = frame.width,
        height = frame.height,
        color_type = ?frame.color_type,
        "Decoded PNG"
    );

    Ok(DecodedImage {
        rgba,
        width: frame.width,
        height: frame.height,
    })
}

/// Composite one straight-alpha pixel onto a white background.
fn over_white(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let blend = |c: u8| -> u8 {
        let a = a as u32;
        ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8
    };
    [blend(r), blend(g), blend(b), 255]
}

/// Encode a monochrome image as a 1-bit greyscale PNG.
///
/// Uses fast settings; run [`optimize_png`] afterwards for the smallest file.
pub fn encode_mono_png(image: &MonoImage) -> Result<Vec<u8>, RenderError> {
    let packed = image.to_packed_bits();
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::One);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        writer
            .write_image_data(&packed)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Re-compress with oxipng (zopfli + adaptive filter selection).
///
/// Falls back to the input if oxipng fails; the original is still valid.
pub fn optimize_png(png_bytes: Vec<u8>) -> Vec<u8> {
    let options = oxipng::Options {
        strip: oxipng::StripChunks::Safe,
        optimize_alpha: false,
        ..Default::default()
    };
    match oxipng::optimize_from_memory(&png_bytes, &options) {
        Ok(optimized) => {
            tracing::debug!(
                before = png_bytes.len(),
                after = optimized.len(),
                "Optimized PNG"
            );
            optimized
        }
        Err(e) => {
            tracing::warn!(%e, "oxipng failed, keeping unoptimized PNG");
            png_bytes
        }
    }
}
