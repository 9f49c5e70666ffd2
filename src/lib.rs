//! Engrave - laser-ready bitmaps from photos
//!
//! PNG in, 1-bit PNG out, dithered by `laser-dither`.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
