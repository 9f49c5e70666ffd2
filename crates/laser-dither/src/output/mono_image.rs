//! MonoImage: the RGBA result of a processing run.
//!
//! [`MonoImage`] owns a freshly allocated RGBA buffer with the same shape as
//! the input. Every pixel is pure black or pure white with alpha 255; the
//! input buffer is never written.

use crate::api::ProcessError;
use crate::buffer::{try_filled, CHANNELS};
use crate::dither::{BLACK, WHITE};

/// Opaque monochrome image.
///
/// # Example
///
/// ```
/// use laser_dither::{process, LaserSettings};
///
/// let rgba = vec![30u8; 3 * 2 * 4];
/// let image = process(&rgba, 3, 2, &LaserSettings::default()).unwrap();
///
/// assert_eq!(image.width(), 3);
/// assert_eq!(image.height(), 2);
/// assert_eq!(image.as_rgba().len(), 3 * 2 * 4);
/// assert!(image.is_black(0, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoImage {
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

impl MonoImage {
    /// Write per-pixel decisions into a new RGBA buffer.
    ///
    /// Each decision (0 or 255) is copied to R, G and B; alpha is 255.
    pub(crate) fn from_decisions(
        decisions: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Self, ProcessError> {
        debug_assert_eq!(decisions.len(), width as usize * height as usize);

        let mut rgba = try_filled(decisions.len().saturating_mul(CHANNELS), 255u8)?;
        for (px, &value) in rgba.chunks_exact_mut(CHANNELS).zip(decisions) {
            px[0] = value;
            px[1] = value;
            px[2] = value;
        }
        Ok(Self {
            rgba,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA bytes, row-major, 4 per pixel.
    #[inline]
    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }

    /// Whether the pixel at `(x, y)` is black (engraved).
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.rgba[i] == BLACK
    }

    /// Number of black pixels, i.e. how much the laser will burn.
    pub fn black_pixel_count(&self) -> usize {
        self.rgba
            .chunks_exact(CHANNELS)
            .filter(|px| px[0] == BLACK)
            .count()
    }

    /// Pack into 1 bit per pixel, MSB first, each row padded to a whole byte.
    ///
    /// A set bit is white, matching 1-bit greyscale PNG sample order.
    pub fn to_packed_bits(&self) -> Vec<u8> {
        let width = self.width as usize;
        let row_bytes = width.div_ceil(8);
        let mut packed = vec![0u8; row_bytes * self.height as usize];

        for (src, dst) in self
            .rgba
            .chunks_exact(width * CHANNELS)
            .zip(packed.chunks_exact_mut(row_bytes))
        {
            for (x, px) in src.chunks_exact(CHANNELS).enumerate() {
                if px[0] == WHITE {
                    dst[x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        packed
    }
}
