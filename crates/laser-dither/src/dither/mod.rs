//! Quantization strategies.
//!
//! Every strategy reduces a [`LuminanceMap`] to one black-or-white decision
//! per pixel. Six strategies are available, selected by
//! [`Algorithm`](crate::Algorithm):
//!
//! - **Threshold**: per-pixel cutoff, no spatial dependency
//! - **Floyd-Steinberg**, **Atkinson**, **Burkes**, **Sierra**: error
//!   diffusion sharing one scan loop, differing only in their [`Kernel`]
//! - **Halftone**: block-averaged dot screen
//!
//! # Architecture
//!
//! All strategies implement the [`Quantize`] trait. [`quantize()`] is the
//! single dispatch point from settings to strategy.

mod atkinson;
mod burkes;
mod floyd_steinberg;
mod halftone;
mod kernel;
mod sierra;
mod threshold;

pub use atkinson::Atkinson;
pub use burkes::Burkes;
pub use floyd_steinberg::FloydSteinberg;
pub use halftone::Halftone;
pub use kernel::*;
pub use sierra::Sierra;
pub use threshold::Threshold;

use crate::api::ProcessError;
use crate::cancel::CancelFlag;
use crate::preprocess::LuminanceMap;
use crate::settings::{Algorithm, LaserSettings};

/// Output value for a black (engraved) pixel.
pub const BLACK: u8 = 0;

/// Output value for a white (untouched) pixel.
pub const WHITE: u8 = 255;

/// Fixed cutoff used by the error diffusion family.
///
/// Independent of [`LaserSettings::threshold`], which only drives
/// [`Threshold`].
pub const DIFFUSION_MIDPOINT: f32 = 128.0;

/// A quantization strategy.
///
/// # Contract
///
/// - `decisions.len() == map.width() * map.height()`
/// - every written decision is [`BLACK`] or [`WHITE`]
/// - `cancel` is checked at least once per row; on cancellation the
///   strategy returns [`ProcessError::Cancelled`] and the contents of
///   `decisions` are unspecified
///
/// Strategies may mutate `map` (error diffusion does).
pub trait Quantize {
    fn quantize(
        &self,
        map: &mut LuminanceMap,
        decisions: &mut [u8],
        cancel: &CancelFlag,
    ) -> Result<(), ProcessError>;
}

/// Run the strategy selected by `settings` over `map`.
pub fn quantize(
    settings: &LaserSettings,
    map: &mut LuminanceMap,
    decisions: &mut [u8],
    cancel: &CancelFlag,
) -> Result<(), ProcessError> {
    debug_assert_eq!(decisions.len(), map.width() * map.height());
    match settings.algorithm {
        Algorithm::Threshold => Threshold::new(settings.threshold).quantize(map, decisions, cancel),
        Algorithm::FloydSteinberg => FloydSteinberg.quantize(map, decisions, cancel),
        Algorithm::Atkinson => Atkinson.quantize(map, decisions, cancel),
        Algorithm::Burkes => Burkes.quantize(map, decisions, cancel),
        Algorithm::Sierra => Sierra.quantize(map, decisions, cancel),
        Algorithm::Halftone => Halftone::new(settings.grid_size).quantize(map, decisions, cancel),
    }
}

/// Core error diffusion loop parameterized by kernel.
///
/// Scans strictly row-major, left to right, top to bottom. For each pixel:
///
/// 1. `old = map[x, y]`
/// 2. `new = old < 128 ? 0 : 255`
/// 3. `new` is written back to the map and to `decisions`
/// 4. `error = old - new` is spread over the kernel, dropping neighbours
///    outside the image
///
/// Accumulated values are never re-clamped; only the comparison against
/// [`DIFFUSION_MIDPOINT`] bounds them.
pub(crate) fn dither_with_kernel(
    map: &mut LuminanceMap,
    decisions: &mut [u8],
    kernel: &Kernel,
    cancel: &CancelFlag,
) -> Result<(), ProcessError> {
    let width = map.width();
    let height = map.height();

    for y in 0..height {
        cancel.check()?;
        for x in 0..width {
            let old = map.get(x, y);
            let (new, decision) = if old < DIFFUSION_MIDPOINT {
                (0.0, BLACK)
            } else {
                (255.0, WHITE)
            };
            map.set(x, y, new);
            decisions[y * width + x] = decision;

            let error = old - new;
            if error != 0.0 {
                diffuse_error(map, x, y, error, kernel);
            }
        }
    }

    Ok(())
}

/// Spread `error` from `(x, y)` over the kernel's neighbours.
///
/// Targets outside the image are dropped, so edge pixels lose part of
/// their error.
#[inline]
pub(crate) fn diffuse_error(
    map: &mut LuminanceMap,
    x: usize,
    y: usize,
    error: f32,
    kernel: &Kernel,
) {
    let divisor = kernel.divisor as f32;
    for &(dx, dy, weight) in kernel.entries {
        map.add_clipped(
            x as isize + dx as isize,
            y as isize + dy as isize,
            error * weight as f32 / divisor,
        );
    }
}
