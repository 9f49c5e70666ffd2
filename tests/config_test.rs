//! Tests for configuration files, presets and watch-mode settings files

mod common;

use common::fixtures::{grey_png, write_file, CONFIG_YAML};
use engrave::error::ConfigError;
use engrave::models::{load_settings_file, AppConfig, SettingsOverrides};
use engrave::services::RenderService;
use laser_dither::{Algorithm, LaserSettings};
use pretty_assertions::assert_eq;

#[test]
fn test_config_file_presets_and_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "engrave.yaml", CONFIG_YAML.as_bytes());

    let config = AppConfig::load(&path).unwrap();

    assert!(!config.optimize);
    let cutout = config.resolve_preset(None).unwrap();
    assert_eq!(cutout.algorithm, Algorithm::Threshold);
    assert_eq!(cutout.threshold, 100);

    let dots = config.preset("dots").unwrap();
    assert_eq!(dots.algorithm, Algorithm::Halftone);
    assert_eq!(dots.grid_size, 4);

    // Built-ins survive alongside file presets
    assert_eq!(
        config.preset("photo").unwrap().algorithm,
        Algorithm::FloydSteinberg
    );
}

#[test]
fn test_unknown_preset() {
    let config = AppConfig::default();
    let err = config.resolve_preset(Some("marble")).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownPreset(name) if name == "marble"));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    assert!(matches!(
        AppConfig::load(&path),
        Err(ConfigError::Read { .. })
    ));
    // The lenient loader falls back to built-ins
    let config = AppConfig::load_or_default(Some(&path));
    assert!(config.optimize);
    assert_eq!(config.default_preset.as_deref(), Some("photo"));
}

#[test]
fn test_settings_file_partial_and_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "laser.yaml",
        b"algorithm: burkes\nbrightness: 400\nscale: 0.01\n",
    );

    let settings = load_settings_file(&path).unwrap();

    assert_eq!(settings.algorithm, Algorithm::Burkes);
    assert_eq!(settings.brightness, 100);
    assert_eq!(settings.scale, 0.1);
    assert_eq!(settings.threshold, 128);
    assert_eq!(settings.contrast, 0);
}

#[test]
fn test_settings_file_algorithm_matches_cli_spelling() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "laser.yaml", b"algorithm: Atkinson\n");

    let from_file = load_settings_file(&path).unwrap().algorithm;
    let from_cli: Algorithm = "Atkinson".parse().unwrap();
    assert_eq!(from_file, from_cli);

    let config = AppConfig::from_yaml("presets:\n  mine:\n    algorithm: Floyd_Steinberg\n").unwrap();
    assert_eq!(
        config.preset("mine").unwrap().algorithm,
        Algorithm::FloydSteinberg
    );
}

#[test]
fn test_settings_file_rejects_unknown_algorithm() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "laser.yaml", b"algorithm: jarvis\n");

    assert!(matches!(
        load_settings_file(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_overrides_on_top_of_preset() {
    let config = AppConfig::default();
    let base = config.preset("wood").unwrap();

    let overrides = SettingsOverrides {
        threshold: Some(300),
        invert: true,
        ..Default::default()
    };
    let settings = overrides.apply(base);

    assert_eq!(settings.algorithm, Algorithm::Atkinson);
    assert_eq!(settings.brightness, 10);
    assert_eq!(settings.threshold, 255);
    assert!(settings.inverted);
}

#[tokio::test]
async fn test_preset_drives_render() {
    let config = AppConfig::from_yaml(CONFIG_YAML).unwrap();
    let cutout = config.preset("cutout").unwrap();
    let service = RenderService::new(config.optimize);

    // 100 is on the white side of the preset's cutoff, 99 is not
    let white = service.render(grey_png(100, 4, 4), cutout.clone()).await.unwrap();
    let black = service.render(grey_png(99, 4, 4), cutout).await.unwrap();

    assert_eq!(white.black_pixels, 0);
    assert_eq!(black.black_pixels, 16);
}

#[test]
fn test_resolved_presets_serialize() {
    let config = AppConfig::default();
    let json = serde_json::to_value(config.resolved_presets()).unwrap();

    let names: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["halftone", "line-art", "photo", "slate", "wood"]);
    assert_eq!(json["slate"]["algorithm"], "sierra");
    assert_eq!(json["slate"]["inverted"], true);
    assert_eq!(
        LaserSettings::default(),
        serde_json::from_value::<LaserSettings>(json["line-art"].clone())
            .unwrap()
            .algorithm(Algorithm::default())
    );
}
