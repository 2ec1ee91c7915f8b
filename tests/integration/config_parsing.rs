//! Integration tests for settings files.

use std::path::Path;

use wss::config::{ConfigFormat, Settings, load_settings, load_settings_from_str, load_settings_or_default, save_settings};
use wss::error::WssError;
use wss::export::ScaleMode;
use wss::render::ResizeStrategy;

use crate::common::fixtures::TestDir;

const FULL_TOML: &str = r#"
[page]
width = 215.9
height = 279.4
margin = 12.7

[export]
scale_mode = "fit-width"
jpeg_quality = 80
file_name = "advent.pdf"

[render]
scale = 3
tiles = "fit"

[store]
path = "data/history.db"
"#;

#[test]
fn test_full_toml_file() {
    let dir = TestDir::new();
    let path = dir.file("config.toml", FULL_TOML);
    let settings = load_settings(&path).unwrap();

    let export = settings.export_options();
    assert!((export.geometry.page_width - 215.9).abs() < 1e-9);
    assert!((export.geometry.content_width() - 190.5).abs() < 1e-9);
    assert_eq!(export.scale_mode, ScaleMode::FitWidth);
    assert_eq!(export.jpeg_quality, 80);
    assert_eq!(settings.file_name(), "advent.pdf");

    let render = settings.render_options();
    assert_eq!(render.scale, 3);
    assert_eq!(render.tile_strategy, ResizeStrategy::Fit);

    let store = settings.store_path(dir.path()).unwrap();
    assert_eq!(store, Some(dir.path().join("data/history.db")));
}

#[test]
fn test_yaml_matches_toml() {
    let yaml = "
page:
  width: 215.9
  height: 279.4
  margin: 12.7
export:
  scale_mode: fit-width
  jpeg_quality: 80
  file_name: advent.pdf
render:
  scale: 3
  tiles: fit
store:
  path: data/history.db
";
    let from_yaml = load_settings_from_str(yaml, ConfigFormat::Yaml).unwrap();
    let from_toml = load_settings_from_str(FULL_TOML, ConfigFormat::Toml).unwrap();
    assert_eq!(from_yaml, from_toml);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let settings = load_settings_from_str("[page]\nmargin = 10\n", ConfigFormat::Toml).unwrap();
    let geometry = settings.geometry();
    assert!((geometry.margin - 10.0).abs() < 1e-9);
    assert!((geometry.page_width - 210.0).abs() < 1e-9);
    assert_eq!(settings.export_options().scale_mode, ScaleMode::FitPage);
    assert_eq!(settings.store_path(Path::new("/etc/wss")).unwrap(), None);
}

#[test]
fn test_invalid_values_rejected() {
    for content in [
        "[page]\nmargin = 0\n",
        "[page]\nmargin = 120\n",
        "[export]\njpeg_quality = 0\n",
        "[render]\nscale = 0\n",
        "[export]\nfile_name = \"  \"\n",
    ] {
        let err = load_settings_from_str(content, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, WssError::ConfigInvalid(_)), "{content}: {err}");
    }
}

#[test]
fn test_parse_errors() {
    let err = load_settings_from_str("[page\nmargin = 1", ConfigFormat::Toml).unwrap_err();
    assert!(matches!(err, WssError::ConfigParse(_)));

    let err = load_settings_from_str("export:\n  scale_mode: sideways\n", ConfigFormat::Yaml).unwrap_err();
    assert!(matches!(err, WssError::ConfigParse(_)));
}

#[test]
fn test_missing_and_unknown_files() {
    let dir = TestDir::new();

    let err = load_settings(dir.join("absent.toml")).unwrap_err();
    assert!(matches!(err, WssError::ConfigNotFound { .. }));
    assert_eq!(load_settings_or_default(&dir.join("absent.toml")).unwrap(), Settings::default());

    let path = dir.file("config.json", "{}");
    assert!(matches!(load_settings(&path), Err(WssError::ConfigParse(_))));
}

#[test]
fn test_save_then_load() -> anyhow::Result<()> {
    let dir = TestDir::new();
    let mut settings = Settings::new();
    settings.page.margin = Some(15.0);
    settings.export.scale_mode = Some(ScaleMode::FitWidth);
    settings.render.tiles = Some(ResizeStrategy::Stretch);

    for name in ["nested/config.toml", "nested/config.yaml"] {
        let path = dir.join(name);
        save_settings(&settings, &path)?;
        assert_eq!(load_settings(&path)?, settings);
    }
    Ok(())
}
