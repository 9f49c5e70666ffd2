//! Caller-side downsampling for the `scale` setting.
//!
//! The processor never resizes on its own. Callers that honour
//! [`LaserSettings::scale`](crate::LaserSettings::scale) run the input
//! through [`downscale()`] first.

use tracing::debug;

use crate::api::ProcessError;
use crate::buffer::{try_filled, PixelBuffer, CHANNELS};
use crate::settings::MIN_SCALE;

/// Target dimensions for a scale factor: `max(1, floor(dim * scale))`.
///
/// The factor is clamped to `[0.1, 1.0]`; non-finite factors mean 1.0.
pub fn scaled_dimensions(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let scale = if scale.is_finite() {
        scale.clamp(MIN_SCALE, 1.0) as f64
    } else {
        1.0
    };
    let w = ((width as f64 * scale).floor() as u32).max(1);
    let h = ((height as f64 * scale).floor() as u32).max(1);
    (w, h)
}

/// Downsample an RGBA image by `scale`.
///
/// Returns the new pixels and dimensions. A factor of 1.0 (or more) returns
/// a copy of the input.
pub fn downscale(
    pixels: &[u8],
    width: u32,
    height: u32,
    scale: f32,
) -> Result<(Vec<u8>, u32, u32), ProcessError> {
    let (new_width, new_height) = scaled_dimensions(width, height, scale);
    resize_box(pixels, width, height, new_width, new_height)
}

/// Box-filter (area average) resize of an RGBA image.
///
/// Each output pixel averages the block of source pixels it covers. Every
/// output pixel covers at least one source pixel, so upscaling degrades to
/// nearest-neighbour.
pub fn resize_box(
    pixels: &[u8],
    width: u32,
    height: u32,
    new_width: u32,
    new_height: u32,
) -> Result<(Vec<u8>, u32, u32), ProcessError> {
    let input = PixelBuffer::new(pixels, width, height)?;
    if new_width == 0 || new_height == 0 {
        return Err(ProcessError::InvalidDimensions {
            width: new_width,
            height: new_height,
        });
    }
    if new_width == width && new_height == height {
        let mut out = try_filled(pixels.len(), 0u8)?;
        out.copy_from_slice(pixels);
        return Ok((out, width, height));
    }

    debug!(width, height, new_width, new_height, "Resizing (box filter)");

    let (sw, sh) = (input.width(), input.height());
    let (dw, dh) = (new_width as usize, new_height as usize);
    let mut out = try_filled(dw * dh * CHANNELS, 0u8)?;

    for oy in 0..dh {
        let y0 = oy * sh / dh;
        let y1 = ((oy + 1) * sh / dh).max(y0 + 1);
        for ox in 0..dw {
            let x0 = ox * sw / dw;
            let x1 = ((ox + 1) * sw / dw).max(x0 + 1);

            let mut sum = [0u64; CHANNELS];
            for sy in y0..y1 {
                let row = &pixels[(sy * sw + x0) * CHANNELS..(sy * sw + x1) * CHANNELS];
                for px in row.chunks_exact(CHANNELS) {
                    for c in 0..CHANNELS {
                        sum[c] += px[c] as u64;
                    }
                }
            }

            let count = ((x1 - x0) * (y1 - y0)) as u64;
            let dst = (oy * dw + ox) * CHANNELS;
            for c in 0..CHANNELS {
                out[dst + c] = ((sum[c] + count / 2) / count) as u8;
            }
        }
    }

    Ok((out, new_width, new_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
        px.repeat((width * height) as usize)
    }

    #[test]
    fn test_scaled_dimensions() {
        assert_eq!(scaled_dimensions(100, 50, 1.0), (100, 50));
        assert_eq!(scaled_dimensions(100, 50, 0.5), (50, 25));
        assert_eq!(scaled_dimensions(99, 51, 0.5), (49, 25));
    }

    #[test]
    fn test_scaled_dimensions_clamps_factor() {
        assert_eq!(scaled_dimensions(100, 100, 0.01), (10, 10));
        assert_eq!(scaled_dimensions(100, 100, 3.0), (100, 100));
        assert_eq!(scaled_dimensions(100, 100, f32::INFINITY), (100, 100));
    }

    #[test]
    fn test_scaled_dimensions_never_zero() {
        assert_eq!(scaled_dimensions(3, 1, 0.1), (1, 1));
    }

    #[test]
    fn test_downscale_noop_at_full_scale() {
        let input = solid(4, 3, [10, 20, 30, 255]);
        let (out, w, h) = downscale(&input, 4, 3, 1.0).unwrap();
        assert_eq!((w, h), (4, 3));
        assert_eq!(out, input);
    }

    #[test]
    fn test_downscale_preserves_uniform_color() {
        let input = solid(10, 10, [200, 100, 50, 255]);
        let (out, w, h) = downscale(&input, 10, 10, 0.3).unwrap();
        assert_eq!((w, h), (3, 3));
        assert_eq!(out, solid(3, 3, [200, 100, 50, 255]));
    }

    #[test]
    fn test_box_filter_averages_blocks() {
        // 2x2 -> 1x1 average of black and white checker
        let input = [
            0, 0, 0, 255, 255, 255, 255, 255, //
            255, 255, 255, 255, 0, 0, 0, 255,
        ];
        let (out, w, h) = resize_box(&input, 2, 2, 1, 1).unwrap();
        assert_eq!((w, h), (1, 1));
        assert_eq!(out, vec![128, 128, 128, 255]);
    }

    #[test]
    fn test_resize_rejects_bad_input() {
        assert!(matches!(
            resize_box(&[0u8; 7], 2, 1, 1, 1),
            Err(ProcessError::BufferLength { .. })
        ));
        assert!(matches!(
            resize_box(&[0u8; 8], 2, 1, 0, 1),
            Err(ProcessError::InvalidDimensions { .. })
        ));
    }
}
