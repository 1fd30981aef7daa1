//! Application configuration
//!
//! Settings are read from a JSON file. The location is taken from the
//! `HDR_QC_CONFIG` environment variable when set, otherwise the user's config
//! directory is used:
//! - Linux: ~/.config/hdr-qc/config.json
//! - macOS: ~/Library/Application Support/hdr-qc/config.json
//! - Windows: %APPDATA%\hdr-qc\config.json
//!
//! A missing file means defaults. Unknown keys are ignored and missing keys
//! take their default values.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::LuminanceOrder;
use crate::state::ratings::{Rating, RatingError};

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "HDR_QC_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid default_rating: {0}")]
    DefaultRating(#[from] RatingError),
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct QcConfig {
    /// Channel order assumed when weighting color channels into luminance
    pub luminance_order: LuminanceOrder,
    /// Initial slider position for files that have not been rated yet (1..=5)
    pub default_rating: u8,
    /// Widest on-screen preview, in logical pixels
    pub preview_max_width: f32,
    /// Height of the histogram chart, in logical pixels
    pub histogram_height: f32,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            luminance_order: LuminanceOrder::AssumeBgr,
            default_rating: Rating::DEFAULT.value(),
            preview_max_width: 640.0,
            histogram_height: 220.0,
        }
    }
}

impl QcConfig {
    /// Load from the default location, falling back to defaults when absent
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check value ranges serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        Rating::try_from(self.default_rating)?;
        if !(self.preview_max_width > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "preview_max_width",
            });
        }
        if !(self.histogram_height > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "histogram_height",
            });
        }
        Ok(())
    }

    /// Rating a new file starts at
    pub fn initial_rating(&self) -> Rating {
        Rating::try_from(self.default_rating).unwrap_or_default()
    }

    fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }

        let mut path = dirs::config_dir()?;
        path.push("hdr-qc");
        path.push("config.json");
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QcConfig::default();
        assert_eq!(config.luminance_order, LuminanceOrder::AssumeBgr);
        assert_eq!(config.default_rating, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = QcConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, QcConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "luminance_order": "follow_source", "default_rating": 5 }"#).unwrap();

        let config = QcConfig::load_from(&path).unwrap();
        assert_eq!(config.luminance_order, LuminanceOrder::FollowSource);
        assert_eq!(config.initial_rating().value(), 5);
        assert_eq!(config.histogram_height, 220.0);
    }

    #[test]
    fn test_out_of_range_rating_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "default_rating": 9 }"#).unwrap();

        let err = QcConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultRating(_)));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = QcConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = QcConfig::default();
        config.preview_max_width = 800.0;
        let restored = QcConfig::from_json(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(config, restored);
    }
}
