//! Configuration schema (schemaparity.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "schemaparity.toml";

/// Environment variable that points at an explicit config file
pub const CONFIG_ENV: &str = "SCHEMAPARITY_CONFIG";

/// Report output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Maximum lines shown per diff block (0 = unlimited)
    #[serde(default = "default_max_diff_lines")]
    pub max_diff_lines: usize,

    /// Also write the report as JSON to this path
    #[serde(default)]
    pub json_path: Option<PathBuf>,
}

fn default_max_diff_lines() -> usize {
    50
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_diff_lines: default_max_diff_lines(),
            json_path: None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Resolve the config for this run: `$SCHEMAPARITY_CONFIG`, then
    /// `./schemaparity.toml`, then defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }

        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            Self::from_file(local)
        } else {
            Ok(Self::default())
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.report.max_diff_lines, 50);
        assert!(config.report.json_path.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml("[report]\njson_path = \"out/parity.json\"\n").unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.report.max_diff_lines, 50);
        assert_eq!(config.report.json_path, Some(PathBuf::from("out/parity.json")));
    }

    #[test]
    fn full_toml() {
        let config = Config::from_toml(
            "log_level = \"debug\"\n[report]\nmax_diff_lines = 0\n",
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.report.max_diff_lines, 0);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let err = Config::from_toml("[report]\nmax_diff_lines = \"many\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }
}
