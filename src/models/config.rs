use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use laser_dither::{Algorithm, LaserSettings};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Application configuration loaded from an engrave YAML file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Preset used when none is named on the command line
    #[serde(default = "default_preset")]
    pub default_preset: Option<String>,

    /// Named settings bundles; merged over the built-in presets
    #[serde(default)]
    pub presets: HashMap<String, LaserSettings>,

    /// Re-compress output PNGs with oxipng
    #[serde(default = "default_optimize")]
    pub optimize: bool,
}

fn default_preset() -> Option<String> {
    Some("photo".to_string())
}

fn default_optimize() -> bool {
    true
}

/// Presets available without any config file.
pub fn builtin_presets() -> HashMap<String, LaserSettings> {
    HashMap::from([
        (
            "photo".to_string(),
            LaserSettings::new().algorithm(Algorithm::FloydSteinberg),
        ),
        (
            "line-art".to_string(),
            LaserSettings::new().algorithm(Algorithm::Threshold),
        ),
        (
            // Wood darkens under the beam; Atkinson's lost error keeps
            // highlights open
            "wood".to_string(),
            LaserSettings::new()
                .algorithm(Algorithm::Atkinson)
                .brightness(10)
                .contrast(20),
        ),
        (
            "slate".to_string(),
            LaserSettings::new()
                .algorithm(Algorithm::Sierra)
                .inverted(true),
        ),
        (
            "halftone".to_string(),
            LaserSettings::new()
                .algorithm(Algorithm::Halftone)
                .grid_size(6),
        ),
    ])
}

impl AppConfig {
    /// Parse a YAML document. Built-in presets fill in any name the
    /// document does not define.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(content)?;
        for (name, settings) in builtin_presets() {
            config.presets.entry(name).or_insert(settings);
        }
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(
            path = %path.display(),
            presets = config.presets.len(),
            default_preset = ?config.default_preset,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load configuration, falling back to defaults if there is no file or
    /// it cannot be used
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file given, using built-in presets");
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(%e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Look up a preset by name, clamped into range
    pub fn preset(&self, name: &str) -> Result<LaserSettings, ConfigError> {
        self.presets
            .get(name)
            .map(LaserSettings::sanitized)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }

    /// Resolve the named preset, or the default preset, or plain defaults
    pub fn resolve_preset(&self, name: Option<&str>) -> Result<LaserSettings, ConfigError> {
        match name.or(self.default_preset.as_deref()) {
            Some(name) => self.preset(name),
            None => Ok(LaserSettings::default()),
        }
    }

    /// All presets, sorted by name and clamped, for display
    pub fn resolved_presets(&self) -> BTreeMap<String, LaserSettings> {
        self.presets
            .iter()
            .map(|(name, settings)| (name.clone(), settings.sanitized()))
            .collect()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_preset: default_preset(),
            presets: builtin_presets(),
            optimize: default_optimize(),
        }
    }
}

/// Load a bare `LaserSettings` YAML document (used by watch mode).
///
/// Missing fields take their defaults; out-of-range values are clamped.
pub fn load_settings_file(path: &Path) -> Result<LaserSettings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty file is a valid "all defaults" document
    if content.trim().is_empty() {
        return Ok(LaserSettings::default());
    }
    let settings: LaserSettings = serde_yaml::from_str(&content)?;
    Ok(settings.sanitized())
}

/// Command-line overrides layered on top of a preset
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub algorithm: Option<Algorithm>,
    pub threshold: Option<i32>,
    pub brightness: Option<i32>,
    pub contrast: Option<i32>,
    pub invert: bool,
    pub scale: Option<f32>,
    pub grid_size: Option<u32>,
}

impl SettingsOverrides {
    /// Apply every override that was given, then clamp
    pub fn apply(&self, mut settings: LaserSettings) -> LaserSettings {
        if let Some(algorithm) = self.algorithm {
            settings.algorithm = algorithm;
        }
        if let Some(threshold) = self.threshold {
            settings.threshold = threshold;
        }
        if let Some(brightness) = self.brightness {
            settings.brightness = brightness;
        }
        if let Some(contrast) = self.contrast {
            settings.contrast = contrast;
        }
        if self.invert {
            settings.inverted = true;
        }
        if let Some(scale) = self.scale {
            settings.scale = scale;
        }
        if let Some(grid_size) = self.grid_size {
            settings.grid_size = grid_size;
        }
        settings.sanitized()
    }
}
