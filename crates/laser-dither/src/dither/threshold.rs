//! Hard threshold quantization.

use crate::api::ProcessError;
use crate::cancel::CancelFlag;
use crate::preprocess::LuminanceMap;

use super::{Quantize, BLACK, WHITE};

/// Per-pixel cutoff with no spatial dependency.
///
/// A pixel is white when its conditioned luminance is `>= threshold`, so a
/// threshold of 0 gives an all-white image and 256 would give all black.
#[derive(Debug, Clone, Copy)]
pub struct Threshold {
    threshold: i32,
}

impl Threshold {
    /// Create a threshold quantizer. The cutoff is clamped to `[0, 255]`.
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold: threshold.clamp(0, 255),
        }
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }
}

impl Quantize for Threshold {
    fn quantize(
        &self,
        map: &mut LuminanceMap,
        decisions: &mut [u8],
        cancel: &CancelFlag,
    ) -> Result<(), ProcessError> {
        let width = map.width();
        let cutoff = self.threshold as f32;

        for (values, row) in map
            .values()
            .chunks_exact(width)
            .zip(decisions.chunks_exact_mut(width))
        {
            cancel.check()?;
            for (&value, decision) in values.iter().zip(row.iter_mut()) {
                *decision = if value >= cutoff { WHITE } else { BLACK };
            }
        }

        Ok(())
    }
}
