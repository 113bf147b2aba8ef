//! Configuration structures for payslip processing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Main configuration for payslip2budget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayslipConfig {
    /// Parsing configuration.
    pub parser: ParserConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Payslip parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Payee written on every transaction.
    pub payee: String,

    /// JSON file with `{category: [keywords]}` overriding the built-in mapping.
    pub categories_file: Option<PathBuf>,

    /// Lines containing any of these (case-insensitive) are summary lines and skipped.
    pub skip_markers: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            payee: "Employer".to_string(),
            categories_file: None,
            skip_markers: default_skip_markers(),
        }
    }
}

/// Summary-line markers skipped by default.
pub fn default_skip_markers() -> Vec<String> {
    vec!["net pay".to_string(), "direct deposit".to_string()]
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format used when none is given on the command line.
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "ynab".to_string(),
        }
    }
}

impl PayslipConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}
