//! Working luminance buffer.

/// Row-major `f32` luminance, one value per pixel.
///
/// Built by the tone conditioner with every value in `[0, 255]`. Error
/// diffusion then accumulates into it in place, and values may leave that
/// range; they are deliberately not re-clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct LuminanceMap {
    values: Vec<f32>,
    width: usize,
    height: usize,
}

impl LuminanceMap {
    /// Zero-filled map.
    #[cfg(test)]
    pub(crate) fn new(width: usize, height: usize) -> Result<Self, crate::api::ProcessError> {
        Ok(Self {
            values: crate::buffer::try_filled(width * height, 0.0)?,
            width,
            height,
        })
    }

    /// Wrap existing values.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `values.len() == width * height`.
    pub fn from_values(values: Vec<f32>, width: usize, height: usize) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            values,
            width,
            height,
        }
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
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.values[y * self.width + x] = value;
    }

    /// Add `delta` at a signed offset position. Out-of-bounds targets are
    /// dropped, never wrapped or clamped to the edge.
    #[inline]
    pub fn add_clipped(&mut self, x: isize, y: isize, delta: f32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.values[y as usize * self.width + x as usize] += delta;
        }
    }

    /// Arithmetic mean over the in-bounds part of a rectangle.
    ///
    /// Returns `None` when the rectangle has no in-bounds pixels.
    pub fn mean_in(&self, x0: usize, y0: usize, w: usize, h: usize) -> Option<f32> {
        let x1 = (x0 + w).min(self.width);
        let y1 = (y0 + h).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        let mut sum = 0.0f64;
        for y in y0..y1 {
            let row = &self.values[y * self.width..(y + 1) * self.width];
            sum += row[x0..x1].iter().map(|&v| v as f64).sum::<f64>();
        }
        let count = ((x1 - x0) * (y1 - y0)) as f64;
        Some((sum / count) as f32)
    }
}
