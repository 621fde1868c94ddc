//! Named conversion settings loaded from TOML, YAML or JSON.
//!
//! A catalogue holds a `default` settings block and any number of named
//! `profiles`:
//!
//! ```toml
//! [default]
//! temporal_style = "ROUND_TRIP_KIND"
//!
//! [profiles.hex]
//! format = "X"
//!
//! [profiles.european]
//! format = "N2"
//! format_provider = { name = "de-DE", decimal_separator = ",", group_separator = "." }
//! ```

use convert_core::ConversionSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading a settings catalogue.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported settings file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Settings profile not found: {0}")]
    ProfileNotFound(String),
}

/// Default settings plus named profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsCatalog {
    #[serde(default)]
    pub default: ConversionSettings,
    #[serde(default)]
    pub profiles: BTreeMap<String, ConversionSettings>,
}

impl SettingsCatalog {
    /// Load a catalogue, choosing the parser from the file extension
    /// (`toml`, `yaml`/`yml` or `json`).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let parse: fn(&str) -> Result<Self, SettingsError> = match extension.as_str() {
            "toml" => Self::from_toml_str,
            "yaml" | "yml" => Self::from_yaml_str,
            "json" => Self::from_json_str,
            _ => return Err(SettingsError::UnsupportedExtension(extension)),
        };
        let catalog = parse(&fs::read_to_string(path)?)?;
        info!(
            "Loaded {} conversion settings profiles from {}",
            catalog.profiles.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Settings for `name`, or the default block when no such profile exists.
    pub fn profile(&self, name: &str) -> &ConversionSettings {
        self.profiles.get(name).unwrap_or(&self.default)
    }

    pub fn require_profile(&self, name: &str) -> Result<&ConversionSettings, SettingsError> {
        self.profiles
            .get(name)
            .ok_or_else(|| SettingsError::ProfileNotFound(name.to_string()))
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convert_core::TemporalStyle;

    const TOML: &str = r#"
[default]
temporal_style = "ROUND_TRIP_KIND | ADJUST_TO_UNIVERSAL"

[profiles.hex]
format = "X"

[profiles.european]
format = "N2"
format_provider = { name = "de-DE", decimal_separator = ",", group_separator = "." }
"#;

    #[test]
    fn test_toml_catalog() {
        let catalog = SettingsCatalog::from_toml_str(TOML).unwrap();
        assert!(catalog.default.temporal_style().adjusts_to_universal());
        assert_eq!(catalog.profile("hex").format(), Some("X"));

        let european = catalog.profile("european").format_provider();
        assert_eq!(european.decimal_separator, ',');
        assert_eq!(european.group_separator, '.');
        assert_eq!(catalog.profile_names().collect::<Vec<_>>(), vec!["european", "hex"]);
    }

    #[test]
    fn test_missing_profile_falls_back_to_default() {
        let catalog = SettingsCatalog::from_toml_str(TOML).unwrap();
        assert_eq!(catalog.profile("unknown"), &catalog.default);
        assert!(matches!(
            catalog.require_profile("unknown"),
            Err(SettingsError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_yaml_and_json_catalogs() {
        let yaml = "profiles:\n  hex:\n    format: x\n";
        let catalog = SettingsCatalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.profile("hex").format(), Some("x"));
        assert_eq!(catalog.default.temporal_style(), TemporalStyle::default());

        let json = r#"{"default": {"format": "G"}}"#;
        let catalog = SettingsCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.default.format(), Some("G"));
        assert!(catalog.profiles.is_empty());
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            SettingsCatalog::from_toml_str("default = 3"),
            Err(SettingsError::TomlError(_))
        ));
        assert!(matches!(
            SettingsCatalog::from_json_str("{"),
            Err(SettingsError::JsonError(_))
        ));
    }
}
