use chrono::{DateTime, FixedOffset};
use scalar_convert::{ConversionEngine, SettingsCatalog, SettingsError};
use std::fs;
use tempfile::TempDir;

const CATALOG_TOML: &str = r#"
[profiles.hex]
format = "X4"

[profiles.european]
format = "N2"
format_provider = { name = "de-DE", decimal_separator = ",", group_separator = "." }

[profiles.utc]
temporal_style = "ADJUST_TO_UNIVERSAL"
"#;

const CATALOG_YAML: &str = r#"
default:
  format: "F1"
profiles:
  plain:
    format: "G"
"#;

#[test]
fn test_catalog_from_toml_file_drives_conversions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conversions.toml");
    fs::write(&path, CATALOG_TOML).unwrap();

    let catalog = SettingsCatalog::from_file(&path).unwrap();
    let engine = ConversionEngine::new();

    let hex: String = engine.convert(255u16, Some(catalog.profile("hex"))).unwrap();
    assert_eq!(hex, "00FF");

    let european: String = engine
        .convert(1234.5f64, Some(catalog.profile("european")))
        .unwrap();
    assert_eq!(european, "1.234,50");

    let shifted: DateTime<FixedOffset> = engine
        .convert(
            "2024-05-01T10:00:00+02:00".to_string(),
            Some(catalog.profile("utc")),
        )
        .unwrap();
    assert_eq!(shifted.offset().local_minus_utc(), 0);
}

#[test]
fn test_catalog_from_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conversions.yml");
    fs::write(&path, CATALOG_YAML).unwrap();

    let catalog = SettingsCatalog::from_file(&path).unwrap();
    let engine = ConversionEngine::new();
    assert_eq!(
        engine.convert::<f64, String>(2.75, Some(catalog.profile("missing"))).unwrap(),
        "2.8"
    );
    assert_eq!(
        engine.convert::<f64, String>(2.75, Some(catalog.profile("plain"))).unwrap(),
        "2.75"
    );
}

#[test]
fn test_catalog_file_errors() {
    let dir = TempDir::new().unwrap();

    let unknown = dir.path().join("conversions.ini");
    fs::write(&unknown, "format = X").unwrap();
    assert!(matches!(
        SettingsCatalog::from_file(&unknown),
        Err(SettingsError::UnsupportedExtension(ext)) if ext == "ini"
    ));

    assert!(matches!(
        SettingsCatalog::from_file(dir.path().join("absent.toml")),
        Err(SettingsError::IoError(_))
    ));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{\"profiles\": 3}").unwrap();
    assert!(matches!(
        SettingsCatalog::from_file(&broken),
        Err(SettingsError::JsonError(_))
    ));
}
