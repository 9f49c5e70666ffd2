//! Halftone dot screen.
//!
//! The image is tiled into non-overlapping `grid x grid` cells. Each cell
//! becomes a single black dot centred on the cell, whose radius grows with
//! the darkness of the cell's mean luminance:
//!
//! ```text
//! max_radius = grid / 2 * 1.2
//! radius     = (255 - avg) / 255 * max_radius
//! ```
//!
//! The 1.2 overshoot lets neighbouring dots touch so a black cell fills
//! completely. Cells at the right and bottom edges may be partial; their mean
//! is taken over in-bounds pixels only, but the dot stays centred where the
//! full cell's centre would be.

use crate::api::ProcessError;
use crate::cancel::CancelFlag;
use crate::preprocess::LuminanceMap;

use super::{Quantize, BLACK, WHITE};
use crate::settings::MIN_GRID_SIZE;

/// Dot growth past the half-cell, so dark dots merge.
const DOT_OVERSHOOT: f32 = 1.2;

/// Geometric halftone renderer.
#[derive(Debug, Clone, Copy)]
pub struct Halftone {
    grid_size: usize,
}

impl Halftone {
    /// Create a halftone screen. Grid sizes below 2 are raised to 2.
    pub fn new(grid_size: u32) -> Self {
        Self {
            grid_size: grid_size.max(MIN_GRID_SIZE) as usize,
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Largest dot radius, reached by a cell averaging 0.
    pub fn max_radius(&self) -> f32 {
        self.grid_size as f32 / 2.0 * DOT_OVERSHOOT
    }

    /// Dot radius for a cell with mean luminance `avg`.
    pub fn radius_for(&self, avg: f32) -> f32 {
        (255.0 - avg) / 255.0 * self.max_radius()
    }
}

impl Quantize for Halftone {
    fn quantize(
        &self,
        map: &mut LuminanceMap,
        decisions: &mut [u8],
        cancel: &CancelFlag,
    ) -> Result<(), ProcessError> {
        let width = map.width();
        let height = map.height();
        let grid = self.grid_size;
        let half = grid as f32 / 2.0;
        let cells_across = width.div_ceil(grid);

        let mut radii = Vec::new();
        radii
            .try_reserve_exact(cells_across)
            .map_err(|_| ProcessError::Allocation {
                bytes: cells_across * std::mem::size_of::<f32>(),
            })?;

        for cell_y in (0..height).step_by(grid) {
            radii.clear();
            for cell_x in (0..width).step_by(grid) {
                // Cells are never empty, the origin is always in bounds
                let avg = map.mean_in(cell_x, cell_y, grid, grid).unwrap_or(255.0);
                radii.push(self.radius_for(avg));
            }

            let centre_y = cell_y as f32 + half;
            for y in cell_y..(cell_y + grid).min(height) {
                cancel.check()?;
                let dy = y as f32 + 0.5 - centre_y;
                let row = &mut decisions[y * width..(y + 1) * width];
                for (x, decision) in row.iter_mut().enumerate() {
                    let cell = x / grid;
                    let dx = x as f32 + 0.5 - ((cell * grid) as f32 + half);
                    *decision = if dx.hypot(dy) <= radii[cell] {
                        BLACK
                    } else {
                        WHITE
                    };
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::run;
    use super::super::{BLACK as B, WHITE as W};
    use super::*;

    fn black_count(decisions: &[u8]) -> usize {
        decisions.iter().filter(|&&d| d == B).count()
    }

    #[test]
    fn test_radius_formula() {
        let screen = Halftone::new(6);
        assert!((screen.max_radius() - 3.6).abs() < 1e-6);
        assert!((screen.radius_for(0.0) - 3.6).abs() < 1e-6);
        assert_eq!(screen.radius_for(255.0), 0.0);
        assert!((screen.radius_for(127.5) - 1.8).abs() < 1e-6);
    }

    #[test]
    fn test_grid_size_floor() {
        assert_eq!(Halftone::new(0).grid_size(), 2);
        assert_eq!(Halftone::new(1).grid_size(), 2);
        assert_eq!(Halftone::new(9).grid_size(), 9);
    }

    #[test]
    fn test_dark_cell_is_fully_black() {
        // Farthest pixel centre is sqrt(2) * 2.5 = 3.54 from the cell centre,
        // inside the 3.6 radius
        assert_eq!(run(&Halftone::new(6), &[0.0; 36], 6, 6), vec![B; 36]);
    }

    #[test]
    fn test_bright_cell_is_fully_white() {
        // Radius 0; the nearest pixel centre is 0.707 away
        assert_eq!(run(&Halftone::new(6), &[255.0; 36], 6, 6), vec![W; 36]);
    }

    #[test]
    fn test_mid_grey_dot_shape() {
        // radius 127 / 255 * 3.6 = 1.79: covers centre offsets (0.5, 0.5)
        // and (0.5, 1.5) but not (1.5, 1.5)
        let out = run(&Halftone::new(6), &[128.0; 36], 6, 6);
        #[rustfmt::skip]
        let expected = vec![
            W, W, W, W, W, W,
            W, W, B, B, W, W,
            W, B, B, B, B, W,
            W, B, B, B, B, W,
            W, W, B, B, W, W,
            W, W, W, W, W, W,
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn test_darker_cells_never_have_smaller_dots() {
        let screen = Halftone::new(6);
        let mut previous = usize::MAX;
        for level in (0..=255).step_by(15) {
            let count = black_count(&run(&screen, &[level as f32; 36], 6, 6));
            assert!(
                count <= previous,
                "level {level} has {count} black pixels, more than {previous}"
            );
            previous = count;
        }
    }

    #[test]
    fn test_partial_cell_mean_uses_in_bounds_pixels() {
        // 8 wide with grid 6: the second cell column holds only x = 6, 7.
        // Both are black, so that partial cell averages 0 and its dot
        // (centred at x = 9) still covers them.
        let mut values = vec![255.0; 8 * 6];
        for y in 0..6 {
            values[y * 8 + 6] = 0.0;
            values[y * 8 + 7] = 0.0;
        }
        let out = run(&Halftone::new(6), &values, 8, 6);
        for y in 0..6 {
            assert_eq!(&out[y * 8..y * 8 + 6], &[W; 6], "row {y} left cell");
            assert_eq!(&out[y * 8 + 6..y * 8 + 8], &[B, B], "row {y} edge cell");
        }
    }

    #[test]
    fn test_partial_edge_cells_of_dark_image() {
        assert_eq!(run(&Halftone::new(6), &[0.0; 49], 7, 7), vec![B; 49]);
    }

    #[test]
    fn test_image_smaller_than_one_cell() {
        // 1x1 in a 6 cell: pixel centre (0.5, 0.5) is 3.54 from (3, 3)
        assert_eq!(run(&Halftone::new(6), &[0.0], 1, 1), vec![B]);
        assert_eq!(run(&Halftone::new(6), &[200.0], 1, 1), vec![W]);
    }

    #[test]
    fn test_cancel_is_checked_per_row() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut map = LuminanceMap::from_values(vec![0.0; 4], 2, 2);
        let mut decisions = vec![0; 4];
        let result = Halftone::new(2).quantize(&mut map, &mut decisions, &cancel);
        assert_eq!(result, Err(ProcessError::Cancelled));
    }
}
