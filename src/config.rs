//! Formatter and engine settings stored in TOML format.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{EngineOptions, Markers, Result, Thresholds};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    pub markers: Markers,
    pub engine: EngineOptions,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    Config::from_toml(&content)
}

pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    std::fs::write(path, config.to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!((config.thresholds.annotation_max_aspect - 0.7).abs() < 1e-6);
        assert_eq!(config.thresholds.annotation_max_chars, 4);
        assert_eq!(config.thresholds.body_min_words, 10);
        assert_eq!(config.thresholds.body_min_chars, 40);
        assert!((config.thresholds.edge_margin_ratio - 0.12).abs() < 1e-6);
        assert!((config.thresholds.top_band_ratio - 0.15).abs() < 1e-6);

        assert_eq!(config.markers.unknown, "()");
        assert_eq!(config.markers.annotation, "//");
        assert_eq!(config.markers.caption, "''");
        assert_eq!(config.markers.body, "[]");

        assert!((config.engine.dilation_factor - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml(
            r##"
            [thresholds]
            body_min_words = 6

            [markers]
            body = "#"
            "##,
        )
        .unwrap();

        assert_eq!(config.thresholds.body_min_words, 6);
        assert_eq!(config.thresholds.annotation_max_chars, 4);
        assert_eq!(config.markers.body, "#");
        assert_eq!(config.markers.unknown, "()");
        assert_eq!(config.engine, EngineOptions::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = Config::default();
        config.engine.dilation_factor = 1.5;
        config.markers.caption = "~".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
