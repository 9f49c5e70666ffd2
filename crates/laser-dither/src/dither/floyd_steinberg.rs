//! Floyd-Steinberg error diffusion dithering algorithm.

use crate::api::ProcessError;
use crate::cancel::CancelFlag;
use crate::preprocess::LuminanceMap;

use super::{dither_with_kernel, Quantize, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion.
///
/// The classic kernel: 100% of the error goes to four neighbours.
///
/// ```text
///        X   7
///    3   5   1      (/16)
/// ```
pub struct FloydSteinberg;

impl Quantize for FloydSteinberg {
    fn quantize(
        &self,
        map: &mut LuminanceMap,
        decisions: &mut [u8],
        cancel: &CancelFlag,
    ) -> Result<(), ProcessError> {
        dither_with_kernel(map, decisions, &FLOYD_STEINBERG, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{ramp_8x2, run};
    use super::super::{BLACK as B, WHITE as W};
    use super::*;

    #[test]
    fn test_all_white_input() {
        assert_eq!(run(&FloydSteinberg, &[255.0; 16], 4, 4), vec![W; 16]);
    }

    #[test]
    fn test_all_black_input() {
        assert_eq!(run(&FloydSteinberg, &[0.0; 16], 4, 4), vec![B; 16]);
    }

    #[test]
    fn test_trace_first_pixels() {
        // 3x2 image, hand-traced:
        // (0,0) 100 -> 0, error 100
        //   (1,0) += 43.75 -> 193.75   (0,1) += 31.25   (1,1) += 6.25
        // (1,0) 193.75 -> 255, error -61.25
        //   (2,0) += -26.796875 -> 13.203125
        //   (0,1) += -11.484375  (1,1) += -19.140625  (2,1) += -3.828125
        let values = [100.0, 150.0, 40.0, 90.0, 130.0, 200.0];
        let mut map = LuminanceMap::from_values(values.to_vec(), 3, 2);
        let mut decisions = vec![0; 6];
        FloydSteinberg
            .quantize(&mut map, &mut decisions, &CancelFlag::new())
            .unwrap();

        assert_eq!(&decisions[..3], &[B, W, B]);
        // (0,1): 90 + 31.25 - 11.484375 = 109.765625 -> black
        assert_eq!(decisions[3], B);
        assert_eq!(&decisions[4..], &[W, W]);
    }

    #[test]
    fn test_known_3x3() {
        let values = [100.0, 150.0, 200.0, 50.0, 127.0, 250.0, 0.0, 80.0, 160.0];
        let out = run(&FloydSteinberg, &values, 3, 3);
        assert_eq!(out, vec![B, W, W, B, W, W, B, B, W]);
    }

    #[test]
    fn test_flat_midpoint_field() {
        // 128 rounds up to white with error -127, which then pushes the
        // right neighbour down: the flat field becomes a checkerboard.
        let out = run(&FloydSteinberg, &[128.0; 16], 4, 4);
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
        let out = run(&FloydSteinberg, &ramp_8x2(), 8, 2);
        assert_eq!(
            out,
            vec![
                B, B, B, W, B, W, W, W, //
                B, B, B, W, B, W, W, W,
            ]
        );
    }
}
