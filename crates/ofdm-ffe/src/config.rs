//! # Configuration File
//!
//! YAML configuration for estimator parameters and logging.
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path in the `FFE_CONFIG` environment variable
//! 2. `./ffe.yaml`
//! 3. `<user config dir>/ofdm-ffe/config.yaml`
//! 4. `/etc/ofdm-ffe/config.yaml`
//!
//! Missing sections and fields take their defaults (DAB mode I).
//!
//! ## Example Configuration
//!
//! ```yaml
//! estimator:
//!   symbol_length: 638
//!   fft_length: 512
//!   num_symbols: 8
//!   alpha: 0.1
//!   sample_rate: 2048000.0
//!
//! logging:
//!   level: debug
//!   format: json
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::params::FfeParams;
use crate::types::FfeError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FFE_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),

    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Validation(#[from] FfeError),
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FfeConfig {
    pub estimator: FfeParams,
    pub logging: LogConfig,
}

impl FfeConfig {
    /// Load from the search path; defaults if no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{CONFIG_ENV}={}",
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        match Self::config_search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as YAML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./ffe.yaml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "ofdm-ffe") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }
        paths.push(PathBuf::from("/etc/ofdm-ffe/config.yaml"));
        paths
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.estimator.validate()?;
        Ok(())
    }
}
