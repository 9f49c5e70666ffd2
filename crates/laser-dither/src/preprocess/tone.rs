//! Tone conditioning: RGBA to a luminance map with brightness, contrast
//! and inversion applied.
//!
//! # Processing Order
//!
//! 1. Luminance with broadcast weights (0.299, 0.587, 0.114)
//! 2. Brightness: `+ brightness * 2.55`
//! 3. Contrast around 128: `factor * (v - 128) + 128`
//! 4. Clamp to `[0, 255]`
//! 5. Invert (`255 - v`) if requested
//!
//! Brightness must come before contrast; swapping them changes results.

use tracing::debug;

use crate::api::ProcessError;
use crate::buffer::{try_filled, PixelBuffer};
use crate::settings::LaserSettings;

use super::luminance::LuminanceMap;

/// Contrast pivot.
const MIDPOINT: f64 = 128.0;

/// Brightness slider units to pixel units (-100..=100 onto -255..=255).
const BRIGHTNESS_STEP: f64 = 2.55;

/// Luminance of an sRGB byte triple, in `[0, 255]`.
///
/// Evaluated as `(299r + 587g + 114b) / 1000` so neutral greys map to
/// exactly their channel value.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (299.0 * r as f64 + 587.0 * g as f64 + 114.0 * b as f64) / 1000.0
}

/// Photographic contrast factor for a slider value.
///
/// The slider is clamped to `[-100, 100]` first; the raw formula divides
/// by zero at 259.
#[inline]
pub fn contrast_factor(contrast: i32) -> f64 {
    let c = contrast.clamp(-100, 100) as f64;
    (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
}

/// Per-pixel tone curve derived from [`LaserSettings`].
#[derive(Debug, Clone, Copy)]
pub struct ToneConditioner {
    brightness_offset: f64,
    contrast_factor: f64,
    inverted: bool,
}

impl ToneConditioner {
    pub fn new(settings: &LaserSettings) -> Self {
        Self {
            brightness_offset: settings.brightness.clamp(-100, 100) as f64 * BRIGHTNESS_STEP,
            contrast_factor: contrast_factor(settings.contrast),
            inverted: settings.inverted,
        }
    }

    /// Condition one pixel. The result is always in `[0, 255]`.
    #[inline]
    pub fn apply(&self, r: u8, g: u8, b: u8) -> f32 {
        let mut gray = luminance(r, g, b) + self.brightness_offset;
        gray = self.contrast_factor * (gray - MIDPOINT) + MIDPOINT;
        gray = gray.clamp(0.0, 255.0);
        if self.inverted {
            gray = 255.0 - gray;
        }
        gray as f32
    }

    /// Build the full luminance map for an image.
    ///
    /// Runs to completion before any quantization starts.
    pub fn condition(&self, input: &PixelBuffer<'_>) -> Result<LuminanceMap, ProcessError> {
        debug!(
            width = input.width(),
            height = input.height(),
            brightness_offset = self.brightness_offset,
            contrast_factor = self.contrast_factor,
            inverted = self.inverted,
            "Conditioning tones"
        );

        let mut values = try_filled(input.pixel_count(), 0.0f32)?;
        for (value, px) in values.iter_mut().zip(input.pixels()) {
            *value = self.apply(px[0], px[1], px[2]);
        }
        Ok(LuminanceMap::from_values(values, input.width(), input.height()))
    }
}
