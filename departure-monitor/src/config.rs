//! Application configuration.
//!
//! Loaded from a TOML file (default `departure-monitor.toml`, overridable
//! with `DEPARTURE_MONITOR_CONFIG`). A missing file means defaults; a file
//! that exists but does not parse is an error. `WL_STOPS` and `WL_API_KEY`
//! override the file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::board::{BoardConfig, SelectionMode};
use crate::domain::{InvalidStopId, StopId, StopQuery};
use crate::poll::PollTiming;
use crate::wienerlinien::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, MonitorClientConfig};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "DEPARTURE_MONITOR_CONFIG";

/// Config file used when `DEPARTURE_MONITOR_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "departure-monitor.toml";

/// Comma separated stop identifiers, replacing `stops`.
pub const STOPS_ENV: &str = "WL_STOPS";

/// API key, replacing `api_key`.
pub const API_KEY_ENV: &str = "WL_API_KEY";

/// Errors loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid stop {value:?}: {source}")]
    Stop {
        value: String,
        #[source]
        source: InvalidStopId,
    },

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Stops to monitor.
    pub stops: Vec<String>,

    /// Sent with every request when set.
    pub api_key: Option<String>,

    pub selection: SelectionMode,

    /// Append an accessibility glyph to line names.
    pub accessibility_suffix: bool,

    pub poll_interval_secs: u64,

    /// Wait between setup attempts for a stop that is not ready.
    pub setup_retry_secs: u64,

    pub provider: ProviderConfig,

    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stops: Vec::new(),
            api_key: None,
            selection: SelectionMode::default(),
            accessibility_suffix: true,
            poll_interval_secs: 30,
            setup_retry_secs: 60,
            provider: ProviderConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Realtime API settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,

    /// Serve canned `{stop}.json` responses from this directory instead
    /// of calling the API.
    pub mock_dir: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mock_dir: None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl AppConfig {
    /// Load from the configured path, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = Self::load_from_path(&path)?;
        config.apply_overrides(
            std::env::var(STOPS_ENV).ok().as_deref(),
            std::env::var(API_KEY_ENV).ok().as_deref(),
        );
        Ok(config)
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Replace stops and API key with values from the environment.
    ///
    /// Blank values are ignored.
    pub fn apply_overrides(&mut self, stops: Option<&str>, api_key: Option<&str>) {
        if let Some(stops) = stops.filter(|s| !s.trim().is_empty()) {
            self.stops = stops
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stops.is_empty() {
            return Err(ConfigError::Invalid("no stops configured"));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.base_url is empty"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider.timeout_secs must be positive"));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid("poll_interval_secs must be positive"));
        }
        if self.setup_retry_secs == 0 {
            return Err(ConfigError::Invalid("setup_retry_secs must be positive"));
        }
        self.stop_queries().map(|_| ())
    }

    /// One query per configured stop, duplicates dropped.
    pub fn stop_queries(&self) -> Result<Vec<StopQuery>, ConfigError> {
        let mut queries: Vec<StopQuery> = Vec::with_capacity(self.stops.len());
        for value in &self.stops {
            let stop = StopId::parse(value).map_err(|source| ConfigError::Stop {
                value: value.clone(),
                source,
            })?;
            if queries.iter().any(|q| q.stop == stop) {
                continue;
            }
            let query = match &self.api_key {
                Some(key) => StopQuery::new(stop).with_api_key(key),
                None => StopQuery::new(stop),
            };
            queries.push(query);
        }
        Ok(queries)
    }

    pub fn board(&self) -> BoardConfig {
        BoardConfig::new(self.selection, self.accessibility_suffix)
    }

    pub fn timing(&self) -> PollTiming {
        PollTiming {
            interval: Duration::from_secs(self.poll_interval_secs),
            setup_retry: Duration::from_secs(self.setup_retry_secs),
        }
    }

    pub fn client(&self) -> MonitorClientConfig {
        MonitorClientConfig::new()
            .with_base_url(&self.provider.base_url)
            .with_timeout(self.provider.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.selection, SelectionMode::FirstAndNext);
        assert!(config.accessibility_suffix);
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.server.bind.port(), 3000);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load_from_path("/nonexistent/departure-monitor.toml").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn loads_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("departure-monitor.toml");
        std::fs::write(
            &path,
            r#"
stops = ["4609", "4610"]
selection = "next"
accessibility_suffix = false

[provider]
timeout_secs = 5
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.stops, vec!["4609", "4610"]);
        assert_eq!(config.selection, SelectionMode::Next);
        assert!(!config.accessibility_suffix);
        assert_eq!(config.provider.timeout_secs, 5);
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.poll_interval_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "stops = 4609").unwrap();

        assert!(matches!(
            AppConfig::load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = AppConfig {
            stops: vec!["1".into()],
            ..AppConfig::default()
        };
        config.apply_overrides(Some(" 4609, 4610 ,,"), Some("secret"));

        assert_eq!(config.stops, vec!["4609", "4610"]);
        assert_eq!(config.api_key.as_deref(), Some("secret"));

        config.apply_overrides(Some(""), None);
        assert_eq!(config.stops, vec!["4609", "4610"]);
    }

    #[test]
    fn validation() {
        assert!(matches!(
            AppConfig::default().validate(),
            Err(ConfigError::Invalid(_))
        ));

        let mut config = AppConfig {
            stops: vec!["4609".into()],
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());

        config.poll_interval_secs = 0;
        assert!(config.validate().is_err());
        config.poll_interval_secs = 30;

        config.stops.push("not a stop".into());
        assert!(matches!(config.validate(), Err(ConfigError::Stop { .. })));
    }

    #[test]
    fn queries_carry_api_key_and_skip_duplicates() {
        let config = AppConfig {
            stops: vec!["4609".into(), "4609".into(), "100".into()],
            api_key: Some("secret".into()),
            ..AppConfig::default()
        };

        let queries = config.stop_queries().unwrap();
        assert_eq!(queries.len(), 2);
        assert!(
            queries
                .iter()
                .all(|q| q.api_key.as_deref() == Some("secret"))
        );
    }
}
