//! Output types for the processing pipeline.
//!
//! [`MonoImage`] is the only result type. It stores RGBA so it can be handed
//! straight back to whatever produced the input, and can pack itself to
//! 1 bit per pixel for compact encoding.

mod mono_image;

pub use mono_image::MonoImage;
