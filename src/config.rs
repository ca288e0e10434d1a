//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::fetcher::ClientConfig;
use crate::heatmap::DEFAULT_MAX_COLUMNS;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Heatmap endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:8000/heatmap".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl EndpointConfig {
    /// HTTP client settings for this endpoint
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.url.clone(),
            request_timeout_ms: self.request_timeout_secs.saturating_mul(1000),
        }
    }
}

/// Dashboard presentation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_max_columns")]
    pub max_columns: usize,

    /// Refresh automatically every N seconds; manual refresh only when unset
    #[serde(default)]
    pub auto_refresh_secs: Option<u64>,

    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

fn default_max_columns() -> usize {
    DEFAULT_MAX_COLUMNS
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_columns: default_max_columns(),
            auto_refresh_secs: None,
            tick_rate_ms: default_tick_rate(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("heatwatch").join("config.toml")),
            Some(PathBuf::from("/etc/heatwatch/config.toml")),
            Some(PathBuf::from("./heatwatch.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, which maps `HEATWATCH_*` names to values
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Endpoint overrides
        if let Some(url) = lookup("HEATWATCH_URL") {
            self.endpoint.url = url;
        }
        if let Some(secs) = lookup("HEATWATCH_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                self.endpoint.request_timeout_secs = s;
            }
        }

        // Dashboard overrides
        if let Some(cols) = lookup("HEATWATCH_MAX_COLUMNS") {
            if let Ok(c) = cols.parse() {
                self.dashboard.max_columns = c;
            }
        }
        if let Some(secs) = lookup("HEATWATCH_AUTO_REFRESH_SECS") {
            if let Ok(s) = secs.parse::<u64>() {
                self.dashboard.auto_refresh_secs = (s > 0).then_some(s);
            }
        }

        // Logging overrides
        if let Some(level) = lookup("HEATWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("HEATWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Heatwatch Configuration
#
# Environment variables override these settings:
# - HEATWATCH_URL
# - HEATWATCH_TIMEOUT_SECS
# - HEATWATCH_MAX_COLUMNS
# - HEATWATCH_AUTO_REFRESH_SECS
# - HEATWATCH_LOG_LEVEL
# - HEATWATCH_LOG_FORMAT

[endpoint]
# Heatmap endpoint (GET, returns {updated_at, heat_values, raw_counts})
url = "http://localhost:8000/heatmap"

# Request timeout in seconds
request_timeout_secs = 10

[dashboard]
# Maximum number of grid columns
max_columns = 5

# Refresh automatically every N seconds (omit for manual refresh only)
# auto_refresh_secs = 30

# How often the dashboard redraws (ms)
tick_rate_ms = 250

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path. The interactive dashboard only logs when this is set.
# file = "/var/log/heatwatch/heatwatch.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint.url, "http://localhost:8000/heatmap");
        assert_eq!(config.endpoint.request_timeout_secs, 10);
        assert_eq!(config.dashboard.max_columns, 5);
        assert!(config.dashboard.auto_refresh_secs.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.endpoint.url, default_url());
        assert_eq!(config.dashboard.max_columns, DEFAULT_MAX_COLUMNS);
        assert_eq!(config.dashboard.tick_rate_ms, 250);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[endpoint]\nurl = \"http://10.0.0.5:9000/heatmap\"\n\n[dashboard]\nauto_refresh_secs = 15"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.endpoint.url, "http://10.0.0.5:9000/heatmap");
        assert_eq!(config.endpoint.request_timeout_secs, 10);
        assert_eq!(config.dashboard.auto_refresh_secs, Some(15));
        assert_eq!(config.dashboard.max_columns, 5);
    }

    #[test]
    fn test_load_errors() {
        let err = Config::load(Path::new("/nonexistent/heatwatch.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[endpoint\nurl = ").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("HEATWATCH_URL", "http://example.test/heatmap"),
            ("HEATWATCH_TIMEOUT_SECS", "3"),
            ("HEATWATCH_MAX_COLUMNS", "8"),
            ("HEATWATCH_AUTO_REFRESH_SECS", "60"),
            ("HEATWATCH_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.endpoint.url, "http://example.test/heatmap");
        assert_eq!(config.endpoint.request_timeout_secs, 3);
        assert_eq!(config.dashboard.max_columns, 8);
        assert_eq!(config.dashboard.auto_refresh_secs, Some(60));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| match k {
            "HEATWATCH_MAX_COLUMNS" => Some("many".to_string()),
            "HEATWATCH_AUTO_REFRESH_SECS" => Some("0".to_string()),
            _ => None,
        });

        assert_eq!(config.dashboard.max_columns, 5);
        assert!(config.dashboard.auto_refresh_secs.is_none());
    }

    #[test]
    fn test_client_config() {
        let endpoint = EndpointConfig {
            url: "http://host/heatmap".to_string(),
            request_timeout_secs: 4,
        };
        let client = endpoint.client_config();
        assert_eq!(client.url, "http://host/heatmap");
        assert_eq!(client.request_timeout_ms, 4000);
    }
}
