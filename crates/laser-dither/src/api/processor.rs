//! LaserProcessor and the one-shot `process` functions.
//!
//! A run is three stages, strictly in order:
//!
//! 1. Tone conditioning into a [`LuminanceMap`](crate::preprocess::LuminanceMap)
//! 2. Quantization by the selected strategy
//! 3. Writing decisions into a new RGBA [`MonoImage`]

use std::time::Instant;

use tracing::debug;

use crate::buffer::{try_filled, PixelBuffer};
use crate::cancel::CancelFlag;
use crate::dither::{self, BLACK};
use crate::output::MonoImage;
use crate::preprocess::ToneConditioner;
use crate::settings::LaserSettings;

use super::ProcessError;

/// Reusable processor for a fixed set of settings.
///
/// Settings are sanitized once on construction, so every run sees in-range
/// values. [`process()`](Self::process) takes `&self`; one processor can
/// handle any number of images.
///
/// # Example
///
/// ```
/// use laser_dither::{Algorithm, LaserProcessor, LaserSettings, PixelBuffer};
///
/// let processor = LaserProcessor::new(
///     LaserSettings::new().algorithm(Algorithm::Threshold).threshold(100),
/// );
///
/// let rgba = [
///     50, 50, 50, 255, //
///     150, 150, 150, 255,
/// ];
/// let image = processor.process(&PixelBuffer::new(&rgba, 2, 1).unwrap()).unwrap();
/// assert!(image.is_black(0, 0));
/// assert!(!image.is_black(1, 0));
/// ```
#[derive(Debug, Clone)]
pub struct LaserProcessor {
    settings: LaserSettings,
}

impl LaserProcessor {
    /// Create a processor, clamping out-of-range settings.
    pub fn new(settings: LaserSettings) -> Self {
        let sanitized = settings.sanitized();
        if sanitized != settings {
            debug!(requested = ?settings, applied = ?sanitized, "Clamped out-of-range settings");
        }
        Self {
            settings: sanitized,
        }
    }

    /// The sanitized settings this processor runs with.
    pub fn settings(&self) -> &LaserSettings {
        &self.settings
    }

    /// Process one image to completion.
    pub fn process(&self, input: &PixelBuffer<'_>) -> Result<MonoImage, ProcessError> {
        self.process_with_cancel(input, &CancelFlag::new())
    }

    /// Process one image, stopping between rows once `cancel` is set.
    ///
    /// # Errors
    ///
    /// - [`ProcessError::Cancelled`] if the flag was observed
    /// - [`ProcessError::Allocation`] if a working buffer could not be
    ///   allocated
    pub fn process_with_cancel(
        &self,
        input: &PixelBuffer<'_>,
        cancel: &CancelFlag,
    ) -> Result<MonoImage, ProcessError> {
        let started = Instant::now();
        let algorithm = self.settings.algorithm;
        debug!(
            width = input.width(),
            height = input.height(),
            algorithm = %algorithm,
            "Processing image"
        );

        cancel.check()?;
        let mut map = ToneConditioner::new(&self.settings).condition(input)?;
        let conditioned = started.elapsed();

        let mut decisions = try_filled(input.pixel_count(), BLACK)?;
        dither::quantize(&self.settings, &mut map, &mut decisions, cancel)?;

        let image = MonoImage::from_decisions(
            &decisions,
            input.width() as u32,
            input.height() as u32,
        )?;

        debug!(
            algorithm = %algorithm,
            conditioning_ms = conditioned.as_millis() as u64,
            total_ms = started.elapsed().as_millis() as u64,
            black_pixels = image.black_pixel_count(),
            "Processed image"
        );
        Ok(image)
    }
}

/// Convert an RGBA buffer to a monochrome image with `settings`.
///
/// `pixels` is row-major RGBA, `width * height * 4` bytes. The input is only
/// read; a new buffer of the same shape is returned.
///
/// # Errors
///
/// - [`ProcessError::InvalidDimensions`] for a zero dimension
/// - [`ProcessError::BufferLength`] if `pixels` has the wrong length
/// - [`ProcessError::Allocation`] if the working buffers cannot be allocated
///
/// # Example
///
/// ```
/// use laser_dither::{process, Algorithm, LaserSettings};
///
/// let grey = vec![128u8; 4 * 4 * 4];
/// let settings = LaserSettings::new().algorithm(Algorithm::Threshold);
///
/// let image = process(&grey, 4, 4, &settings).unwrap();
/// assert_eq!(image.black_pixel_count(), 0);
///
/// let image = process(&grey, 4, 4, &settings.clone().threshold(129)).unwrap();
/// assert_eq!(image.black_pixel_count(), 16);
/// ```
pub fn process(
    pixels: &[u8],
    width: u32,
    height: u32,
    settings: &LaserSettings,
) -> Result<MonoImage, ProcessError> {
    process_with_cancel(pixels, width, height, settings, &CancelFlag::new())
}

/// [`process()`] with cooperative cancellation.
///
/// The flag is polled between rows. A cancelled run returns
/// [`ProcessError::Cancelled`], never a partial image.
pub fn process_with_cancel(
    pixels: &[u8],
    width: u32,
    height: u32,
    settings: &LaserSettings,
    cancel: &CancelFlag,
) -> Result<MonoImage, ProcessError> {
    let input = PixelBuffer::new(pixels, width, height)?;
    LaserProcessor::new(settings.clone()).process_with_cancel(&input, cancel)
}
