//! Public API for the laser-dither crate.
//!
//! This module provides the entry points ([`process()`], [`LaserProcessor`])
//! and the error types they return.

mod error;
mod processor;

pub use error::{ProcessError, SettingsError};
pub use processor::{process, process_with_cancel, LaserProcessor};
