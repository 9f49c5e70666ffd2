//! Validated RGBA input and fallible buffer allocation.

use crate::api::ProcessError;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Borrowed, validated RGBA input image.
///
/// Row-major, top-to-bottom, 4 bytes per pixel. The processor only reads
/// R, G and B; alpha is ignored.
///
/// # Example
///
/// ```
/// use laser_dither::PixelBuffer;
///
/// let rgba = vec![128u8; 2 * 3 * 4];
/// let input = PixelBuffer::new(&rgba, 2, 3).unwrap();
/// assert_eq!(input.pixel_count(), 6);
///
/// assert!(PixelBuffer::new(&rgba, 3, 3).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Validate dimensions and length.
    ///
    /// # Errors
    ///
    /// - [`ProcessError::InvalidDimensions`] if either dimension is zero or
    ///   the byte count overflows `usize`
    /// - [`ProcessError::BufferLength`] if `data.len() != width * height * 4`
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self, ProcessError> {
        let invalid = ProcessError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(invalid)?;
        if data.len() != expected {
            return Err(ProcessError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width: width as usize,
            height: height as usize,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Iterate over `[r, g, b, a]` pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &'a [u8]> {
        self.data.chunks_exact(CHANNELS)
    }
}

/// Allocate `len` copies of `value`, reporting failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, ProcessError> {
    let bytes = len.saturating_mul(std::mem::size_of::<T>());
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ProcessError::Allocation { bytes })?;
    buf.resize(len, value);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_buffer() {
        let data = vec![0u8; 5 * 4 * 4];
        let buf = PixelBuffer::new(&data, 5, 4).unwrap();
        assert_eq!(buf.width(), 5);
        assert_eq!(buf.height(), 4);
        assert_eq!(buf.pixel_count(), 20);
        assert_eq!(buf.pixels().count(), 20);
    }

    #[test]
    fn test_zero_width_rejected() {
        let err = PixelBuffer::new(&[], 0, 4).unwrap_err();
        assert_eq!(
            err,
            ProcessError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn test_zero_height_rejected() {
        let err = PixelBuffer::new(&[], 4, 0).unwrap_err();
        assert!(matches!(err, ProcessError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let data = vec![0u8; 15];
        let err = PixelBuffer::new(&data, 2, 2).unwrap_err();
        assert_eq!(
            err,
            ProcessError::BufferLength {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_rgb_length_is_not_rgba() {
        // 3 bytes per pixel is a common caller mistake
        let data = vec![0u8; 2 * 2 * 3];
        assert!(matches!(
            PixelBuffer::new(&data, 2, 2),
            Err(ProcessError::BufferLength { .. })
        ));
    }

    #[test]
    fn test_try_filled() {
        let buf = try_filled(10, 7u8).unwrap();
        assert_eq!(buf, vec![7u8; 10]);
    }

    #[test]
    fn test_try_filled_reports_huge_allocation() {
        let err = try_filled(usize::MAX / 2, 0f32).unwrap_err();
        assert!(matches!(err, ProcessError::Allocation { .. }));
    }
}
