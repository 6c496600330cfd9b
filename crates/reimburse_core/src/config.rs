//! Runtime configuration: model artifact location and log level.
//!
//! Sources, lowest to highest precedence: built-in defaults, the TOML file
//! named by `REIMBURSE_CONFIG`, then the `REIMBURSE_MODEL_PATH` and
//! `REIMBURSE_LOG_LEVEL` environment variables.

use crate::errors::{ReimburseError, Result};
use crate::loader::CachedModelLoader;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the residual model artifact
pub const MODEL_FILE_NAME: &str = "gbm_residual.json";

/// Environment variable naming a TOML config file
pub const CONFIG_ENV: &str = "REIMBURSE_CONFIG";
/// Environment variable overriding the model path
pub const MODEL_PATH_ENV: &str = "REIMBURSE_MODEL_PATH";
/// Environment variable overriding the log level
pub const LOG_LEVEL_ENV: &str = "REIMBURSE_LOG_LEVEL";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReimburseConfig {
    /// Residual model configuration
    pub model: ModelConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Residual model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Location of the model artifact
    pub path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// `gbm_residual.json` beside the running executable, or in the working
/// directory when the executable location is unknown.
pub fn default_model_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(MODEL_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(MODEL_FILE_NAME))
}

impl ReimburseConfig {
    /// Load configuration from a TOML file; absent keys keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            ReimburseError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| ReimburseError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(MODEL_PATH_ENV).filter(|v| !v.is_empty()) {
            self.model.path = PathBuf::from(path);
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.is_empty()) {
            self.logging.level = level;
        }
    }

    /// Build configuration from a variable lookup: optional config file,
    /// then overrides.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_ENV).filter(|v| !v.is_empty()) {
            Some(file) => Self::load_from_file(file)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup);
        Ok(config)
    }

    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Model provider reading from the configured path
    pub fn model_loader(&self) -> CachedModelLoader {
        CachedModelLoader::new(&self.model.path)
    }
}
