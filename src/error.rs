use std::path::PathBuf;

use laser_dither::ProcessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG decode error: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Unsupported PNG: {0}")]
    UnsupportedPng(String),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render task failed: {0}")]
    TaskFailed(String),
}

impl RenderError {
    /// Whether this error only means a newer request took over.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RenderError::Process(ProcessError::Cancelled))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}
