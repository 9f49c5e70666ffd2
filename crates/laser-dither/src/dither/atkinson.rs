//! Atkinson error diffusion dithering algorithm.
//!
//! Atkinson dithering distributes only 75% of the quantization error (6/8).
//! Originally developed by Bill Atkinson for the Apple Macintosh; the lost
//! error gives lighter shadows and blown-out highlights, which engraves
//! with crisper detail than full-propagation kernels.

use crate::api::ProcessError;
use crate::cancel::CancelFlag;
use crate::preprocess::LuminanceMap;

use super::{dither_with_kernel, Quantize, ATKINSON};

/// Atkinson error diffusion.
///
/// ```text
///        X   1   1
///    1   1   1
///        1          (/8)
/// ```
///
/// Each neighbour receives 1/8 of the error, 6/8 in total.
pub struct Atkinson;

impl Quantize for Atkinson {
    fn quantize(
        &self,
        map: &mut LuminanceMap,
        decisions: &mut [u8],
        cancel: &CancelFlag,
    ) -> Result<(), ProcessError> {
        dither_with_kernel(map, decisions, &ATKINSON, cancel)
    }
}
