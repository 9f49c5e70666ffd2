pub mod config;

pub use config::{builtin_presets, load_settings_file, AppConfig, SettingsOverrides};
