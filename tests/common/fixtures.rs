//! Test fixtures: small PNG images and config documents.

use std::path::{Path, PathBuf};

/// Encode raw samples as a PNG
pub fn encode_png(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("PNG header");
        writer.write_image_data(data).expect("PNG data");
    }
    buf
}

/// Uniform 8-bit greyscale PNG
pub fn grey_png(value: u8, width: u32, height: u32) -> Vec<u8> {
    encode_png(
        width,
        height,
        png::ColorType::Grayscale,
        &vec![value; (width * height) as usize],
    )
}

/// Horizontal black-to-white ramp, as RGB
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let data: Vec<u8> = (0..height)
        .flat_map(|_| {
            (0..width).flat_map(move |x| {
                let v = (x * 255 / (width - 1).max(1)) as u8;
                [v, v, v]
            })
        })
        .collect();
    encode_png(width, height, png::ColorType::Rgb, &data)
}

/// Fully transparent black RGBA PNG
pub fn transparent_png(width: u32, height: u32) -> Vec<u8> {
    encode_png(
        width,
        height,
        png::ColorType::Rgba,
        &vec![0; (width * height * 4) as usize],
    )
}

/// Write bytes to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

/// Config with one custom preset and optimization off
pub const CONFIG_YAML: &str = r#"
default_preset: cutout
optimize: false
presets:
  cutout:
    algorithm: threshold
    threshold: 100
  dots:
    algorithm: halftone
    gridSize: 4
"#;
