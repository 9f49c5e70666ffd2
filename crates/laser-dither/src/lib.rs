//! laser-dither: monochrome dithering for laser engraving
//!
//! Converts an RGBA image into pure black and white, where black is where
//! the laser fires. The pipeline is deterministic and single-threaded:
//!
//! ```text
//! RGBA input
//!     |
//!     v
//! [Tone conditioner]   luminance, brightness, contrast, invert
//!     |
//!     v
//! LuminanceMap (f32)
//!     |
//!     v
//! [Quantizer]          threshold | error diffusion | halftone
//!     |
//!     v
//! MonoImage            R = G = B in {0, 255}, alpha 255
//! ```
//!
//! # Quick Start
//!
//! ```
//! use laser_dither::{process, Algorithm, LaserSettings};
//!
//! let rgba = vec![100u8; 8 * 8 * 4];
//! let settings = LaserSettings::new()
//!     .algorithm(Algorithm::Atkinson)
//!     .contrast(20);
//!
//! let image = process(&rgba, 8, 8, &settings).unwrap();
//! assert_eq!(image.width(), 8);
//! assert!(image.as_rgba().chunks(4).all(|px| px[3] == 255));
//! ```
//!
//! # Algorithms
//!
//! Six strategies are selected by [`Algorithm`]:
//!
//! - Threshold (hard cutoff at `settings.threshold`)
//! - Floyd-Steinberg (classic, default)
//! - Atkinson (75% error propagation, crisp engraving detail)
//! - Burkes (two-row, full propagation)
//! - Sierra (three-row, smoothest gradients)
//! - Halftone (dot screen, `settings.grid_size` cell)
//!
//! The error diffusion family always quantizes at 128; `threshold` only
//! drives the Threshold strategy.
//!
//! # Settings
//!
//! Out-of-range values are clamped, never rejected. See
//! [`LaserSettings::sanitized()`].
//!
//! # Cancellation
//!
//! [`process_with_cancel()`] polls a [`CancelFlag`] between rows so a
//! preview can be abandoned when newer settings arrive.

pub mod api;
pub mod buffer;
pub mod cancel;
pub mod dither;
pub mod output;
pub mod preprocess;
pub mod settings;


pub use api::{process, process_with_cancel, LaserProcessor, ProcessError, SettingsError};
pub use buffer::PixelBuffer;
pub use cancel::CancelFlag;
pub use dither::Quantize;
pub use output::MonoImage;
pub use preprocess::downscale;
pub use settings::{Algorithm, LaserSettings};
