pub mod png_io;

pub use png_io::{decode_png, encode_mono_png, optimize_png, DecodedImage};
