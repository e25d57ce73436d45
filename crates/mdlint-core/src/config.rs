//! Configuration schema (mdlint.toml)

use serde::{Deserialize, Serialize};

/// Default glob pattern for documents
pub const DEFAULT_PATTERN: &str = "**/*.md";

fn default_patterns() -> Vec<String> {
    vec![DEFAULT_PATTERN.to_string()]
}

fn default_jobs() -> usize {
    1
}

/// Directory scanning settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Glob patterns selecting documents, relative to the scan root
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Glob patterns removed from the match set
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Worker threads used for validation
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Follow symbolic links while walking
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            exclude: Vec::new(),
            jobs: default_jobs(),
            follow_links: false,
        }
    }
}

/// Schema loading settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Fail catalog loading on unrecognized field type names instead of
    /// treating them as `string`
    #[serde(default)]
    pub strict_types: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Scan settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Schema settings
    #[serde(default)]
    pub schema: SchemaConfig,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if config.scan.jobs == 0 {
            return Err(ConfigError::ParseError("scan.jobs must be at least 1".to_string()));
        }
        if config.scan.patterns.is_empty() {
            return Err(ConfigError::ParseError("scan.patterns must not be empty".to_string()));
        }

        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
