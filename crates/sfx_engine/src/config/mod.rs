//! Configuration system
//!
//! Settings structs implement [`Config`] to load and save themselves as TOML
//! or RON, picked by file extension. Missing fields fall back to defaults
//! through `#[serde(default)]` on each struct.

pub use serde::{Deserialize, Serialize};

use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match format_of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Load configuration, using defaults when the file does not exist
    fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("{} not found, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match format_of(path)? {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

enum Format {
    Toml,
    Ron,
}

fn format_of(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(Format::Toml),
        Some("ron") => Ok(Format::Ron),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sfx_player::{EmissionStrategy, SfxConfig};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sfx_engine_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_unsupported_extension() {
        let result = SfxConfig::default().save_to_file(temp_path("settings.json"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = SfxConfig::load_or_default(temp_path("missing.toml")).unwrap();
        assert_eq!(config, SfxConfig::default());
    }

    #[test]
    fn test_ron_file() {
        let path = temp_path("sfx.ron");
        std::fs::write(&path, "(sfx_volume: 0.4, strategy: on_demand)").unwrap();

        let config = SfxConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.sfx_volume, 0.4);
        assert_eq!(config.strategy, EmissionStrategy::OnDemand);
        assert_eq!(config.max_pitch, 1.5);
    }

    #[test]
    fn test_parse_error() {
        let path = temp_path("broken.toml");
        std::fs::write(&path, "sfx_volume = [").unwrap();

        let result = SfxConfig::load_from_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
