//! Error types for the laser-dither public API.

use thiserror::Error;

/// Failure of a processing run.
///
/// A run either returns a complete output buffer or one of these errors;
/// partially dithered buffers are never handed out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// Width or height is zero, or the pixel count overflows `usize`.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// RGBA byte count does not match `width * height * 4`.
    #[error("pixel buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// A working buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes")]
    Allocation { bytes: usize },

    /// The run was cancelled before it finished.
    #[error("processing cancelled")]
    Cancelled,
}

/// Invalid settings that cannot be clamped into range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}
