use std::path::Path;
use std::time::Instant;

use laser_dither::{downscale, process_with_cancel, CancelFlag, LaserSettings};

use crate::error::RenderError;
use crate::rendering::{decode_png, encode_mono_png, optimize_png};

/// Result of one render: the encoded PNG plus what went into it
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub black_pixels: usize,
}

impl RenderOutput {
    /// Fraction of pixels the laser will burn
    pub fn coverage(&self) -> f64 {
        let total = self.width as f64 * self.height as f64;
        if total == 0.0 {
            0.0
        } else {
            self.black_pixels as f64 / total
        }
    }
}

/// Decode, scale, dither and encode PNG images
#[derive(Debug, Clone)]
pub struct RenderService {
    optimize: bool,
}

impl RenderService {
    pub fn new(optimize: bool) -> Self {
        Self { optimize }
    }

    /// Render PNG bytes to a monochrome PNG
    ///
    /// Uses spawn_blocking to avoid blocking the async runtime during
    /// CPU-intensive decoding, dithering and compression.
    pub async fn render(
        &self,
        input: Vec<u8>,
        settings: LaserSettings,
    ) -> Result<RenderOutput, RenderError> {
        self.render_with_cancel(input, settings, CancelFlag::new())
            .await
    }

    /// [`render`](Self::render), stopping early once `cancel` is set
    pub async fn render_with_cancel(
        &self,
        input: Vec<u8>,
        settings: LaserSettings,
        cancel: CancelFlag,
    ) -> Result<RenderOutput, RenderError> {
        let optimize = self.optimize;
        tokio::task::spawn_blocking(move || render_blocking(&input, &settings, optimize, &cancel))
            .await
            .map_err(|e| RenderError::TaskFailed(e.to_string()))?
    }

    /// Read `input`, render it and write the result to `output`
    pub async fn render_file(
        &self,
        input: &Path,
        output: &Path,
        settings: LaserSettings,
    ) -> Result<RenderOutput, RenderError> {
        let bytes = tokio::fs::read(input).await?;
        let rendered = self.render(bytes, settings).await?;
        tokio::fs::write(output, &rendered.png).await?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            bytes = rendered.png.len(),
            "Wrote engraving bitmap"
        );
        Ok(rendered)
    }
}

/// The full pipeline on the current thread
pub fn render_blocking(
    input: &[u8],
    settings: &LaserSettings,
    optimize: bool,
    cancel: &CancelFlag,
) -> Result<RenderOutput, RenderError> {
    let started = Instant::now();
    let settings = settings.sanitized();

    let decoded = decode_png(input)?;
    cancel.check()?;

    let (rgba, width, height) = if settings.scale < 1.0 {
        downscale(&decoded.rgba, decoded.width, decoded.height, settings.scale)?
    } else {
        (decoded.rgba, decoded.width, decoded.height)
    };

    let image = process_with_cancel(&rgba, width, height, &settings, cancel)?;
    let black_pixels = image.black_pixel_count();

    let mut png = encode_mono_png(&image)?;
    if optimize {
        cancel.check()?;
        png = optimize_png(png);
    }

    tracing::info!(
        algorithm = %settings.algorithm,
        source_width = decoded.width,
        source_height = decoded.height,
        width,
        height,
        black_pixels,
        bytes = png.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Rendered image"
    );

    Ok(RenderOutput {
        png,
        width,
        height,
        black_pixels,
    })
}
