//! Latest-request-wins preview rendering.
//!
//! Every submission gets a generation number. Submitting cancels the
//! previous request's [`CancelFlag`], so its dither loop stops at the next
//! row. A result whose generation is no longer the newest is reported as
//! [`PreviewOutcome::Superseded`] and never handed to the caller as a
//! finished image.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use laser_dither::{CancelFlag, LaserSettings};

use crate::error::RenderError;
use crate::services::renderer::{render_blocking, RenderOutput};

/// What happened to a submitted preview
#[derive(Debug)]
pub enum PreviewOutcome {
    /// The newest request finished
    Completed { generation: u64, output: RenderOutput },
    /// A newer request was submitted; this result was dropped
    Superseded { generation: u64 },
}

impl PreviewOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            PreviewOutcome::Completed { generation, .. }
            | PreviewOutcome::Superseded { generation } => *generation,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, PreviewOutcome::Superseded { .. })
    }
}

/// Re-renders previews, discarding stale ones
#[derive(Debug)]
pub struct PreviewService {
    optimize: bool,
    latest: Arc<AtomicU64>,
    in_flight: Mutex<CancelFlag>,
}

impl PreviewService {
    pub fn new(optimize: bool) -> Self {
        Self {
            optimize,
            latest: Arc::new(AtomicU64::new(0)),
            in_flight: Mutex::new(CancelFlag::new()),
        }
    }

    /// Generation of the newest submission (0 before the first)
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Start rendering `input` with `settings` on the blocking pool.
    ///
    /// The generation bump and the cancellation of the previous request
    /// happen before this returns, so two calls in a row always supersede
    /// the first, whatever order their futures are awaited in.
    pub fn submit(
        &self,
        input: Arc<Vec<u8>>,
        settings: LaserSettings,
    ) -> impl Future<Output = Result<PreviewOutcome, RenderError>> + Send + 'static {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancelFlag::new();
        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            in_flight.cancel();
            *in_flight = cancel.clone();
        }
        tracing::debug!(generation, algorithm = %settings.algorithm, "Preview submitted");

        let optimize = self.optimize;
        let task = tokio::task::spawn_blocking(move || {
            render_blocking(&input, &settings, optimize, &cancel)
        });
        let latest = self.latest.clone();

        async move {
            let result = task
                .await
                .map_err(|e| RenderError::TaskFailed(e.to_string()))?;

            if latest.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "Preview superseded");
                return Ok(PreviewOutcome::Superseded { generation });
            }
            match result {
                Ok(output) => Ok(PreviewOutcome::Completed { generation, output }),
                // Only a newer submission cancels, so this is a race with one
                Err(e) if e.is_cancelled() => Ok(PreviewOutcome::Superseded { generation }),
                Err(e) => Err(e),
            }
        }
    }
}

/// Writes finished previews to one output path, newest generation last.
///
/// Writes are serialized, and a generation older than the last one written
/// is skipped. Each file is written beside the target and renamed over it,
/// so readers never see a half-written PNG.
#[derive(Debug, Clone)]
pub struct PreviewWriter {
    path: PathBuf,
    written: Arc<tokio::sync::Mutex<u64>>,
}

impl PreviewWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: Arc::new(tokio::sync::Mutex::new(0)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `png` for `generation`. Returns `false` if a newer generation
    /// is already on disk.
    pub async fn write(&self, generation: u64, png: &[u8]) -> std::io::Result<bool> {
        let mut written = self.written.lock().await;
        if generation <= *written {
            tracing::debug!(generation, newest = *written, "Skipping stale preview write");
            return Ok(false);
        }

        let staging = self.staging_path();
        tokio::fs::write(&staging, png).await?;
        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e);
        }
        *written = generation;
        Ok(true)
    }

    /// `.<name>.partial` in the output's directory; rename needs the same
    /// filesystem
    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "preview.png".to_string());
        self.path.with_file_name(format!(".{name}.partial"))
    }
}
