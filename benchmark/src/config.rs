// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration for benchmark runs.
//!
//! Parsed into a raw form first, then validated. Every field has a default,
//! so an empty file or no file at all yields [`BenchConfig::default`].
//! Command-line flags override values loaded here.

use std::path::{Path, PathBuf};

use patternbench_core::DEFAULT_THRESHOLD;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration parse error: {message}")]
    Parse { message: String },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawBenchConfig {
    #[serde(default = "default_threshold")]
    threshold: f64,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default = "default_database_path")]
    database_path: String,
    #[serde(default = "default_persist")]
    persist: bool,
    #[serde(default)]
    report_dir: Option<String>,
    #[serde(default)]
    warmup_messages: u64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_language() -> String {
    "rust".to_string()
}

fn default_database_path() -> String {
    "telemetry_results.db".to_string()
}

fn default_persist() -> bool {
    true
}

/// Validated benchmark configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Filter threshold applied by every pipeline variant
    pub threshold: f64,
    /// Language tag written to the result line and the result row
    pub language: String,
    /// SQLite database receiving one row per run
    pub database_path: PathBuf,
    /// Whether to insert result rows at all
    pub persist: bool,
    /// Directory for JSON reports, none to skip
    pub report_dir: Option<PathBuf>,
    /// Untimed messages pushed through each pipeline before measuring
    pub warmup_messages: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            language: default_language(),
            database_path: PathBuf::from(default_database_path()),
            persist: default_persist(),
            report_dir: None,
            warmup_messages: 0,
        }
    }
}

/// Configuration loader with validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<BenchConfig, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> Result<BenchConfig, ConfigError> {
        if content.trim().is_empty() {
            return Ok(BenchConfig::default());
        }

        let raw: RawBenchConfig =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                message: format!("YAML parse error: {}", e),
            })?;

        Self::validate(raw)
    }

    fn validate(raw: RawBenchConfig) -> Result<BenchConfig, ConfigError> {
        validate_threshold(raw.threshold)?;

        if raw.language.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "language",
                value: raw.language,
                reason: "Language tag cannot be empty".to_string(),
            });
        }

        if raw.database_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database_path",
                value: raw.database_path,
                reason: "Database path cannot be empty".to_string(),
            });
        }

        Ok(BenchConfig {
            threshold: raw.threshold,
            language: raw.language,
            database_path: PathBuf::from(raw.database_path),
            persist: raw.persist,
            report_dir: raw.report_dir.map(PathBuf::from),
            warmup_messages: raw.warmup_messages,
        })
    }
}

/// Thresholds must be finite; NaN would silently drop every record.
pub fn validate_threshold(threshold: f64) -> Result<(), ConfigError> {
    if !threshold.is_finite() {
        return Err(ConfigError::InvalidValue {
            field: "threshold",
            value: threshold.to_string(),
            reason: "Threshold must be a finite number".to_string(),
        });
    }
    Ok(())
}
