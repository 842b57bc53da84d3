// Configuration for the round-trip verifier

use crate::types::CompressionType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where scenario artifacts live and how the writer lays them out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub work_dir: PathBuf,
    pub artifact_prefix: String,
    pub extension: String,
    pub compression: CompressionType,
    /// Rows per stored block
    pub block_rows: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("target").join("test").join("tmp"),
            artifact_prefix: "TestStrataFile".to_string(),
            extension: "strata".to_string(),
            compression: CompressionType::None,
            block_rows: 10_000,
        }
    }
}

/// Row batch sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub capacity: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrataConfig {
    pub storage: StorageConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

impl StrataConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_str(&content)
    }

    /// Load configuration from a JSON, TOML or YAML document
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        if let Ok(config) = serde_json::from_str::<StrataConfig>(content) {
            return Ok(config);
        }

        if let Ok(config) = toml::from_str::<StrataConfig>(content) {
            return Ok(config);
        }

        if let Ok(config) = serde_yaml::from_str::<StrataConfig>(content) {
            return Ok(config);
        }

        Err(ConfigError::ParseError("Unknown format".to_string()))
    }

    /// Defaults overlaid with `STRATA_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay `STRATA_*` environment variables onto this configuration.
    /// Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("STRATA_WORK_DIR") {
            self.storage.work_dir = PathBuf::from(dir);
        }

        if let Ok(capacity) = std::env::var("STRATA_BATCH_CAPACITY") {
            if let Ok(c) = capacity.parse::<usize>() {
                self.batch.capacity = c;
            }
        }

        if let Ok(compression) = std::env::var("STRATA_COMPRESSION") {
            if let Ok(c) = compression.parse::<CompressionType>() {
                self.storage.compression = c;
            }
        }

        if let Ok(level) = std::env::var("STRATA_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "batch.capacity must be > 0".to_string(),
            ));
        }

        if self.storage.block_rows == 0 {
            return Err(ConfigError::ValidationError(
                "storage.block_rows must be > 0".to_string(),
            ));
        }

        if self.storage.artifact_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.artifact_prefix cannot be empty".to_string(),
            ));
        }

        if self.storage.extension.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.extension cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Configuration(err.to_string())
    }
}
