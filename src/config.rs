//! Configuration types for lclog

use serde::{Deserialize, Serialize};

use crate::{LogError, Result};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Which integrity checks to run
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Report rendering and pass tuning
    #[serde(default)]
    pub report: ReportConfig,
}

/// Integrity checks to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Verify the footer checksum
    #[serde(default = "default_true")]
    pub check_checksum: bool,
    /// Detect sequence-number gaps
    #[serde(default = "default_true")]
    pub check_gaps: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_checksum: true,
            check_gaps: true,
        }
    }
}

/// Report rendering and pass tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Gaps listed individually in the text summary
    #[serde(default = "default_max_listed_gaps")]
    pub max_listed_gaps: usize,
    /// Buffer size for the checksum pass
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
}

fn default_max_listed_gaps() -> usize {
    5
}

fn default_read_buffer_size() -> usize {
    64 * 1024
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_listed_gaps: default_max_listed_gaps(),
            read_buffer_size: default_read_buffer_size(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LogError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns error if the text cannot be parsed or is invalid
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| LogError::ConfigError(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<()> {
        if self.report.read_buffer_size == 0 {
            return Err(LogError::ConfigError(
                "report.read_buffer_size must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
