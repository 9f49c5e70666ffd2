//! Error diffusion kernel definitions.
//!
//! Each kernel specifies how quantization error is distributed to
//! neighbouring pixels that have not been visited yet.

/// An error diffusion kernel.
///
/// Each entry is an offset `(dx, dy)` from the current pixel plus a weight
/// numerator. A neighbour receives `error * weight / divisor`.
///
/// # Error Propagation
///
/// The total error propagated is `sum(weights) / divisor`. Floyd-Steinberg,
/// Burkes and Sierra propagate 100%; Atkinson intentionally propagates only
/// 75%.
///
/// # Reach
///
/// `max_dy` is how many rows ahead the kernel writes. `dy` is never negative
/// and entries with `dy == 0` always have `dx > 0`, so a kernel only touches
/// pixels later in row-major scan order.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries.
    pub entries: &'static [(i32, i32, u8)],

    /// Common denominator of all weights.
    pub divisor: u8,

    /// Maximum dy value in entries.
    pub max_dy: usize,
}

impl Kernel {
    /// Fraction of the quantization error handed to neighbours.
    pub fn propagation(&self) -> f32 {
        let sum: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        sum as f32 / self.divisor as f32
    }

    /// Weight of the entry at `(dx, dy)` as a fraction, if present.
    pub fn weight_at(&self, dx: i32, dy: i32) -> Option<f32> {
        self.entries
            .iter()
            .find(|&&(ex, ey, _)| ex == dx && ey == dy)
            .map(|&(_, _, w)| w as f32 / self.divisor as f32)
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// ```text
///        X   7
///    3   5   1      (/16)
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};

/// Atkinson dithering kernel.
///
/// Six neighbours at 1/8 each, 6/8 in total. The lost quarter of the
/// error is what gives Atkinson its lighter, higher-contrast look.
///
/// ```text
///        X   1   1
///    1   1   1
///        1          (/8)
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),  // right
        (2, 0, 1),  // two right
        (-1, 1, 1), // bottom-left
        (0, 1, 1),  // bottom
        (1, 1, 1),  // bottom-right
        (0, 2, 1),  // two below
    ],
    divisor: 8,
    max_dy: 2,
};

/// Burkes dithering kernel.
///
/// ```text
///            X   8   4
///    2   4   8   4   2      (/32)
/// ```
pub const BURKES: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
    ],
    divisor: 32,
    max_dy: 1,
};

/// Sierra (full / Sierra-3) dithering kernel.
///
/// ```text
///            X   5   3
///    2   4   5   4   2
///        2   3   2          (/32)
/// ```
pub const SIERRA: Kernel = Kernel {
    entries: &[
        (1, 0, 5),
        (2, 0, 3),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 5),
        (1, 1, 4),
        (2, 1, 2),
        (-1, 2, 2),
        (0, 2, 3),
        (1, 2, 2),
    ],
    divisor: 32,
    max_dy: 2,
};
