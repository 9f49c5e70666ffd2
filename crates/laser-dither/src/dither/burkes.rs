//! Burkes error diffusion dithering algorithm.
//!
//! Burkes is a two-row simplification of Stucki. It propagates 100% of the
//! error over seven neighbours, so it tracks mean tone closely while staying
//! cheaper than three-row kernels.

use crate::api::ProcessError;
use crate::cancel::CancelFlag;
use crate::preprocess::LuminanceMap;

use super::{dither_with_kernel, Quantize, BURKES};

/// Burkes error diffusion.
///
/// ```text
///            X   8   4
///    2   4   8   4   2      (/32)
/// ```
pub struct Burkes;

impl Quantize for Burkes {
    fn quantize(
        &self,
        map: &mut LuminanceMap,
        decisions: &mut [u8],
        cancel: &CancelFlag,
    ) -> Result<(), ProcessError> {
        dither_with_kernel(map, decisions, &BURKES, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{ramp_8x2, run};
    use super::super::{diffuse_error, BLACK as B, WHITE as W};
    use super::*;

    #[test]
    fn test_interior_pixel_propagates_everything() {
        let mut map = LuminanceMap::new(5, 2).unwrap();
        diffuse_error(&mut map, 2, 0, 32.0, &BURKES);
        #[rustfmt::skip]
        let expected: [f32; 10] = [
            0.0, 0.0, 0.0, 8.0, 4.0,
            2.0, 4.0, 8.0, 4.0, 2.0,
        ];
        assert_eq!(map.values(), &expected);
    }

    #[test]
    fn test_edge_targets_are_dropped() {
        // From the bottom-right corner nothing is in bounds
        let mut map = LuminanceMap::new(3, 2).unwrap();
        diffuse_error(&mut map, 2, 1, 64.0, &BURKES);
        assert!(map.values().iter().all(|&v| v == 0.0));

        // From (0, 0) the two left entries on the next row fall outside
        let mut map = LuminanceMap::new(3, 2).unwrap();
        diffuse_error(&mut map, 0, 0, 32.0, &BURKES);
        let sum: f32 = map.values().iter().sum();
        assert_eq!(sum, 32.0 - 2.0 - 4.0);
    }

    #[test]
    fn test_uniform_extremes_are_stable() {
        assert_eq!(run(&Burkes, &[0.0; 12], 4, 3), vec![B; 12]);
        assert_eq!(run(&Burkes, &[255.0; 12], 4, 3), vec![W; 12]);
    }

    #[test]
    fn test_flat_midpoint_field() {
        let out = run(&Burkes, &[128.0; 16], 4, 4);
        assert_eq!(
            out,
            vec![
                W, B, W, B, //
                B, W, B, W, //
                W, B, W, B, //
                B, W, B, W,
            ]
        );
    }

    #[test]
    fn test_ramp() {
        let out = run(&Burkes, &ramp_8x2(), 8, 2);
        assert_eq!(
            out,
            vec![
                B, B, B, W, B, W, W, W, //
                B, B, B, W, W, B, W, W,
            ]
        );
    }
}
