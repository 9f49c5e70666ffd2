//! Image preparation before quantization.
//!
//! - [`ToneConditioner`] turns RGBA into a [`LuminanceMap`] with brightness,
//!   contrast and inversion applied. This is the first stage of every run.
//! - [`downscale()`] implements the caller-side `scale` setting. It is not
//!   part of [`process()`](crate::process); run it on the input first if the
//!   image should shrink.
//!
//! # Example
//!
//! ```
//! use laser_dither::preprocess::{downscale, ToneConditioner};
//! use laser_dither::{LaserSettings, PixelBuffer};
//!
//! let settings = LaserSettings::new().scale(0.5).brightness(10);
//! let rgba = vec![90u8; 8 * 8 * 4];
//!
//! let (small, w, h) = downscale(&rgba, 8, 8, settings.scale).unwrap();
//! assert_eq!((w, h), (4, 4));
//!
//! let input = PixelBuffer::new(&small, w, h).unwrap();
//! let map = ToneConditioner::new(&settings).condition(&input).unwrap();
//! assert_eq!(map.values().len(), 16);
//! ```

mod luminance;
mod resize;
mod tone;

pub use luminance::LuminanceMap;
pub use resize::{downscale, resize_box, scaled_dimensions};
pub use tone::{contrast_factor, luminance, ToneConditioner};
