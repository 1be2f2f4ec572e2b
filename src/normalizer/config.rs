use crate::normalizer::layout::ColumnLayout;
use crate::normalizer::sheet::Sheet;
use crate::normalizer::NormalizeError;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("No sheets configured")]
    NoSheets,
}

/// Normalization run settings, read from TOML
///
/// ```toml
/// crane_model = "GMK5130-1"
/// output = "dataset.json"
///
/// [[sheets]]
/// name = "40.1t"
/// path = "sheets/40.1t.csv"
/// counterweight_t = 40.1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    pub crane_model: String,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub columns: ColumnLayout,

    /// Processed in declared order
    pub sheets: Vec<SheetSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSource {
    pub name: String,
    pub path: PathBuf,
    pub counterweight_t: f64,
}

fn default_output() -> PathBuf {
    PathBuf::from("dataset.json")
}

impl NormalizeConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: NormalizeConfig = toml::from_str(toml_str)?;
        if config.sheets.is_empty() {
            return Err(ConfigError::NoSheets);
        }
        Ok(config)
    }

    /// Load a config file. Relative sheet and output paths are resolved
    /// against the config file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_toml_str(&contents)?;
        if let Some(dir) = path.parent() {
            config.resolve_relative_to(dir);
        }

        tracing::info!(
            "Loaded normalization config from {} ({} sheets)",
            path.display(),
            config.sheets.len()
        );
        Ok(config)
    }

    fn resolve_relative_to(&mut self, dir: &Path) {
        if self.output.is_relative() {
            self.output = dir.join(&self.output);
        }
        for sheet in &mut self.sheets {
            if sheet.path.is_relative() {
                sheet.path = dir.join(&sheet.path);
            }
        }
    }

    /// Read every configured sheet, in order
    pub fn load_sheets(&self) -> Result<Vec<Sheet>, NormalizeError> {
        self.sheets
            .iter()
            .map(|source| Sheet::from_csv_path(&source.name, source.counterweight_t, &source.path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
crane_model = "GMK5130-1"

[[sheets]]
name = "40.1t"
path = "sheets/40.1t.csv"
counterweight_t = 40.1

[[sheets]]
name = "6.0t"
path = "/data/6.0t.csv"
counterweight_t = 6.0
"#;

    #[test]
    fn test_parse_with_defaults() {
        let config = NormalizeConfig::from_toml_str(CONFIG).unwrap();

        assert_eq!(config.crane_model, "GMK5130-1");
        assert_eq!(config.output, PathBuf::from("dataset.json"));
        assert_eq!(config.columns, ColumnLayout::default());
        assert_eq!(config.sheets.len(), 2);
        assert_eq!(config.sheets[0].name, "40.1t");
        assert_eq!(config.sheets[1].counterweight_t, 6.0);
    }

    #[test]
    fn test_column_overrides() {
        let toml_str = r#"
crane_model = "GMK5130-1"

[columns]
radius = "Radius"
front_left = "FL"

[[sheets]]
name = "a"
path = "a.csv"
counterweight_t = 1.0
"#;
        let config = NormalizeConfig::from_toml_str(toml_str).unwrap();

        assert_eq!(config.columns.radius, "Radius");
        assert_eq!(config.columns.front_left, "FL");
        assert_eq!(config.columns.slew_position, "Slew_position");
    }

    #[test]
    fn test_no_sheets_rejected() {
        let result = NormalizeConfig::from_toml_str("crane_model = \"X\"\nsheets = []\n");
        assert!(matches!(result, Err(ConfigError::NoSheets)));
    }

    #[test]
    fn test_missing_crane_model_rejected() {
        let result = NormalizeConfig::from_toml_str("sheets = []\n");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_paths_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("normalize.toml");
        fs::write(&path, CONFIG).unwrap();

        let config = NormalizeConfig::from_file(&path).unwrap();

        assert_eq!(config.output, dir.path().join("dataset.json"));
        assert_eq!(config.sheets[0].path, dir.path().join("sheets/40.1t.csv"));
        assert_eq!(config.sheets[1].path, PathBuf::from("/data/6.0t.csv"));
    }
}
