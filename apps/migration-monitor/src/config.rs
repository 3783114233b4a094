//! # Configuration
//!
//! Effective settings of the monitor binary.
//!
//! ## Precedence (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `migration-monitor.toml` when present)
//! 3. Environment variables
//! 4. CLI flags (applied by the command that uses them)
//!
//! ## Environment Variables
//!
//! - `MIGRATION_MONITOR_RATE_LIMIT`: Requests per second (0 to disable)
//! - `MIGRATION_MONITOR_CORS_ORIGINS`: Comma-separated origins, or "*"
//! - `MIGRATION_MONITOR_REPORT_PATH`: JSON lines file receiving reports
//! - `MIGRATION_MONITOR_WATCH_INTERVAL`: Seconds between watcher ticks

use migration_monitor_core::MonitorError;
use migration_monitor_core::primitives::DEFAULT_RETAINED_EVENTS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "migration-monitor.toml";

/// Default rate limit: 100 requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Default seconds between watcher ticks.
pub const DEFAULT_WATCH_INTERVAL_SECS: u64 = 30;

// =============================================================================
// SECTIONS
// =============================================================================

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only, `["*"]` means any.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// `host:port` bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_WATCH_INTERVAL_SECS,
        }
    }
}

/// `[report]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// JSON lines file receiving every failure report. In-memory only if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Number of recent reports kept in memory.
    pub retained: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: None,
            retained: DEFAULT_RETAINED_EVENTS,
        }
    }
}

// =============================================================================
// MONITOR CONFIG
// =============================================================================

/// Complete configuration of the binary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub server: ServerConfig,
    pub watch: WatchConfig,
    pub report: ReportConfig,
}

impl MonitorConfig {
    /// Load the effective configuration.
    ///
    /// An explicit `path` must exist. Without one, `DEFAULT_CONFIG_FILE` is
    /// read if present and defaults are used otherwise. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, MonitorError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, MonitorError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
            .map_err(|e| MonitorError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML text. Missing sections and keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, MonitorError> {
        toml::from_str(text).map_err(|e| MonitorError::ConfigError(e.to_string()))
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, MonitorError> {
        toml::to_string_pretty(self).map_err(|e| MonitorError::SerializationError(e.to_string()))
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Unparsable numeric values are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("MIGRATION_MONITOR_RATE_LIMIT") {
            match value.trim().parse() {
                Ok(rps) => self.server.rate_limit = rps,
                Err(_) => tracing::warn!("Ignoring invalid MIGRATION_MONITOR_RATE_LIMIT: {}", value),
            }
        }
        if let Some(value) = lookup("MIGRATION_MONITOR_CORS_ORIGINS") {
            self.server.cors_origins = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(value) = lookup("MIGRATION_MONITOR_REPORT_PATH") {
            let trimmed = value.trim();
            self.report.output = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
        }
        if let Some(value) = lookup("MIGRATION_MONITOR_WATCH_INTERVAL") {
            match value.trim().parse() {
                Ok(secs) => self.watch.interval_secs = secs,
                Err(_) => {
                    tracing::warn!("Ignoring invalid MIGRATION_MONITOR_WATCH_INTERVAL: {}", value);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = MonitorConfig::from_toml_str("[server]\nport = 9090\n").unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.watch.interval_secs, DEFAULT_WATCH_INTERVAL_SECS);
        assert_eq!(config.report.retained, DEFAULT_RETAINED_EVENTS);
    }

    #[test]
    fn env_overrides_file() {
        let mut config = MonitorConfig::from_toml_str("[server]\nrate_limit = 5\n").unwrap();
        config.apply_overrides(env(&[
            ("MIGRATION_MONITOR_RATE_LIMIT", "0"),
            ("MIGRATION_MONITOR_REPORT_PATH", "/tmp/reports.jsonl"),
            ("MIGRATION_MONITOR_CORS_ORIGINS", "http://a.example, http://b.example"),
        ]));

        assert_eq!(config.server.rate_limit, 0);
        assert_eq!(config.report.output, Some(PathBuf::from("/tmp/reports.jsonl")));
        assert_eq!(config.server.cors_origins.len(), 2);
    }

    #[test]
    fn invalid_numeric_override_is_ignored() {
        let mut config = MonitorConfig::default();
        config.apply_overrides(env(&[("MIGRATION_MONITOR_WATCH_INTERVAL", "soon")]));
        assert_eq!(config.watch.interval_secs, DEFAULT_WATCH_INTERVAL_SECS);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            MonitorConfig::from_toml_str("[server\nport = "),
            Err(MonitorError::ConfigError(_))
        ));
    }

    #[test]
    fn renders_and_reparses() {
        let mut config = MonitorConfig::default();
        config.report.output = Some(PathBuf::from("reports.jsonl"));
        let text = config.to_toml_string().unwrap();
        assert_eq!(MonitorConfig::from_toml_str(&text).unwrap(), config);
    }
}
