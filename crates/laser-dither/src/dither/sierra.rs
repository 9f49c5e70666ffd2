//! Sierra (Sierra-3) error diffusion dithering algorithm.

use crate::api::ProcessError;
use crate::cancel::CancelFlag;
use crate::preprocess::LuminanceMap;

use super::{dither_with_kernel, Quantize, SIERRA};

/// Full Sierra error diffusion over three rows.
///
/// ```text
///            X   5   3
///    2   4   5   4   2
///        2   3   2          (/32)
/// ```
///
/// Spreading the error two rows down produces smoother gradients than
/// Floyd-Steinberg at the cost of more work per pixel.
pub struct Sierra;

impl Quantize for Sierra {
    fn quantize(
        &self,
        map: &mut LuminanceMap,
        decisions: &mut [u8],
        cancel: &CancelFlag,
    ) -> Result<(), ProcessError> {
        dither_with_kernel(map, decisions, &SIERRA, cancel)
    }
}
