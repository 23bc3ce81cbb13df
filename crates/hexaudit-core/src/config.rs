//! Configuration types for hexaudit.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::deps::AllowedDependency;
use crate::orchestrator::DEFAULT_CONCURRENCY;
use crate::window::DEFAULT_PAD;

/// Top-level review configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// File extension selecting which files are reviewed.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Glob patterns excluded from discovery.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Bound on concurrent (file, validator) tasks, and therefore on
    /// outstanding advisor calls.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Context lines shown above and below each flagged range.
    #[serde(default = "default_pad")]
    pub context_pad: usize,

    /// Model name passed to the advisor endpoint.
    #[serde(default)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible advisor endpoint.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Dependency allow-list for the audit pass.
    #[serde(default = "default_allowed_deps")]
    pub allowed_deps: Vec<AllowedDependency>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            exclude: default_exclude(),
            concurrency: default_concurrency(),
            context_pad: default_pad(),
            model: None,
            base_url: None,
            allowed_deps: default_allowed_deps(),
        }
    }
}

impl ReviewConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }
}

fn default_extension() -> String {
    ".py".to_string()
}

fn default_exclude() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/__pycache__/**".to_string(),
        "**/.venv/**".to_string(),
    ]
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_pad() -> usize {
    DEFAULT_PAD
}

/// Returns the standard backend dependency allow-list.
#[must_use]
pub fn default_allowed_deps() -> Vec<AllowedDependency> {
    [
        ("falcon", "~=3.0.0"),
        ("gunicorn", "~=20.0.0"),
        ("gevent", "~=21.1.0"),
        ("attrs", "~=21.2.0"),
        ("sqlalchemy", "~=1.4.0"),
        ("alembic", "~=1.7.0"),
        ("kafka", "~=2.0.0"),
        ("click", "~=7.1.0"),
        ("numpy", "~=1.21.0"),
        ("pandas", "~=1.3.0"),
        ("openpyxl", "~=3.0.0"),
        ("pydantic", "~=1.8.0"),
        ("pymssql", "~=2.2.0"),
        ("cx_Oracle", "~=8.2.0"),
        ("kombu", "~=5.1.0"),
        ("psycopg2", "~=2.9.0"),
        ("jwt", "~=2.0.0"),
        ("pythonjsonlogger", "~=2.0.0"),
        ("requests", "~=2.27.0"),
        ("plotly", "~=5.5.0"),
        ("pytest", "~=6.2.0"),
        ("isort", "~=5.10.0"),
        ("yapf", "~=0.32.0"),
        ("toml", "~=0.10.2"),
        ("docxtpl", "~=0.16.4"),
    ]
    .into_iter()
    .map(|(name, version)| AllowedDependency::new(name, version))
    .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in the config file.
    #[error("failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ReviewConfig::default();
        assert_eq!(config.extension, ".py");
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.context_pad, 5);
        assert!(config.allowed_deps.iter().any(|d| d.name == "sqlalchemy"));
    }

    #[test]
    fn parses_partial_toml() {
        let toml = r#"
extension = ".py"
concurrency = 8

[[allowed_deps]]
name = "requests"
version = "~=2.27.0"
"#;
        let config = ReviewConfig::parse(toml).expect("parse");
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.context_pad, 5);
        assert_eq!(config.allowed_deps.len(), 1);
        assert_eq!(config.allowed_deps[0].name, "requests");
    }

    #[test]
    fn rejects_invalid_toml() {
        assert!(matches!(
            ReviewConfig::parse("extension = ["),
            Err(ConfigError::Parse { .. })
        ));
    }
}
