//! Processing settings and algorithm selection.
//!
//! [`LaserSettings`] carries every knob the processor understands. All
//! fields have defaults, so partial documents (YAML presets, JSON from a UI)
//! deserialize into a complete value.
//!
//! # Out-of-range values
//!
//! Values are never rejected for being out of range. [`LaserSettings::sanitized()`]
//! clamps them into their documented ranges, mirroring slider-bound inputs.
//! Only an unrecognized algorithm name is an error, since an enum cannot be
//! clamped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::SettingsError;

/// Quantization strategy.
///
/// Four error-diffusion kernels share one scan loop; `Threshold` and
/// `Halftone` have no spatial error propagation.
///
/// Serializes as its kebab-case name. Deserializes through [`FromStr`], so
/// documents accept the same spellings as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Algorithm {
    /// Hard cutoff at `threshold`.
    Threshold,

    /// Floyd-Steinberg error diffusion (100% propagation, 4 neighbours).
    #[default]
    FloydSteinberg,

    /// Atkinson error diffusion (75% propagation, 6 neighbours).
    ///
    /// The lost quarter of the error gives lighter shadows and crisper
    /// highlights than the full-propagation kernels.
    Atkinson,

    /// Burkes error diffusion (100% propagation, 2 rows).
    Burkes,

    /// Sierra (full, 3 rows) error diffusion.
    Sierra,

    /// Dot-screen halftone: cell darkness becomes dot radius.
    Halftone,
}

impl Algorithm {
    /// All algorithms, in menu order.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Threshold,
        Algorithm::FloydSteinberg,
        Algorithm::Atkinson,
        Algorithm::Burkes,
        Algorithm::Sierra,
        Algorithm::Halftone,
    ];

    /// Canonical kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Threshold => "threshold",
            Algorithm::FloydSteinberg => "floyd-steinberg",
            Algorithm::Atkinson => "atkinson",
            Algorithm::Burkes => "burkes",
            Algorithm::Sierra => "sierra",
            Algorithm::Halftone => "halftone",
        }
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Algorithm::Threshold => "hard black/white cutoff at the threshold value",
            Algorithm::FloydSteinberg => "classic error diffusion, 4 neighbours, full propagation",
            Algorithm::Atkinson => "error diffusion, 6 neighbours, 75% propagation",
            Algorithm::Burkes => "two-row error diffusion, 7 neighbours",
            Algorithm::Sierra => "three-row error diffusion, 10 neighbours",
            Algorithm::Halftone => "newspaper-style dot screen, dot size follows darkness",
        }
    }

    /// Whether this algorithm diffuses quantization error to neighbours.
    pub fn is_error_diffusion(self) -> bool {
        matches!(
            self,
            Algorithm::FloydSteinberg | Algorithm::Atkinson | Algorithm::Burkes | Algorithm::Sierra
        )
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "threshold" => Ok(Algorithm::Threshold),
            "floyd-steinberg" | "floydsteinberg" => Ok(Algorithm::FloydSteinberg),
            "atkinson" => Ok(Algorithm::Atkinson),
            "burkes" => Ok(Algorithm::Burkes),
            "sierra" => Ok(Algorithm::Sierra),
            "halftone" => Ok(Algorithm::Halftone),
            _ => Err(SettingsError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Default cutoff for [`Algorithm::Threshold`].
pub const DEFAULT_THRESHOLD: i32 = 128;

/// Default halftone cell size in pixels.
pub const DEFAULT_GRID_SIZE: u32 = 6;

/// Smallest usable halftone cell.
pub const MIN_GRID_SIZE: u32 = 2;

/// Smallest caller-side downsampling factor.
pub const MIN_SCALE: f32 = 0.1;

/// Settings for one processing run.
///
/// # Defaults
///
/// - algorithm: Floyd-Steinberg
/// - threshold: 128 (only used by `Threshold`)
/// - brightness / contrast: 0 (range -100..=100)
/// - inverted: false
/// - scale: 1.0 (applied by the caller, see [`crate::preprocess::downscale`])
/// - grid_size: 6 (only used by `Halftone`)
///
/// # Example
///
/// ```
/// use laser_dither::{Algorithm, LaserSettings};
///
/// let settings = LaserSettings::new()
///     .algorithm(Algorithm::Atkinson)
///     .brightness(10)
///     .contrast(25);
///
/// assert_eq!(settings.algorithm, Algorithm::Atkinson);
/// assert_eq!(settings.threshold, 128);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserSettings {
    /// Quantization strategy.
    pub algorithm: Algorithm,

    /// Cutoff for [`Algorithm::Threshold`] (0..=255). Luminance `>=` the
    /// threshold becomes white.
    pub threshold: i32,

    /// Additive luminance shift (-100..=100), scaled by 2.55.
    pub brightness: i32,

    /// Contrast around the 128 pivot (-100..=100).
    pub contrast: i32,

    /// Flip luminance after brightness and contrast.
    #[serde(alias = "invert")]
    pub inverted: bool,

    /// Downsampling factor (0.1..=1.0). Not applied by the processor itself.
    pub scale: f32,

    /// Halftone cell size in pixels (>= 2).
    #[serde(alias = "gridSize", alias = "grid-size")]
    pub grid_size: u32,
}

impl Default for LaserSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            threshold: DEFAULT_THRESHOLD,
            brightness: 0,
            contrast: 0,
            inverted: false,
            scale: 1.0,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

impl LaserSettings {
    /// Create settings with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    #[inline]
    pub fn brightness(mut self, brightness: i32) -> Self {
        self.brightness = brightness;
        self
    }

    #[inline]
    pub fn contrast(mut self, contrast: i32) -> Self {
        self.contrast = contrast;
        self
    }

    #[inline]
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    #[inline]
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn grid_size(mut self, grid_size: u32) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Return a copy with every field clamped into its documented range.
    ///
    /// A non-finite `scale` falls back to 1.0.
    pub fn sanitized(&self) -> Self {
        let scale = if self.scale.is_finite() {
            self.scale.clamp(MIN_SCALE, 1.0)
        } else {
            1.0
        };
        Self {
            algorithm: self.algorithm,
            threshold: self.threshold.clamp(0, 255),
            brightness: self.brightness.clamp(-100, 100),
            contrast: self.contrast.clamp(-100, 100),
            inverted: self.inverted,
            scale,
            grid_size: self.grid_size.max(MIN_GRID_SIZE),
        }
    }

    /// Whether [`sanitized()`](Self::sanitized) would change anything.
    pub fn is_in_range(&self) -> bool {
        self.sanitized() == *self
    }
}
