// ── Monitor configuration ──
//
// TOML file + environment + defaults, merged through figment. The file
// lives at the platform config dir; every key can also be set through
// a VULPINI_-prefixed environment variable, and the binary layers CLI
// flags on top of whatever loads here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Everything the monitor needs to start.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Base URL of the proxy's management API.
    #[serde(default = "default_url")]
    pub url: String,

    /// Delay between the end of one poll cycle and the start of the
    /// next, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Start with the light palette instead of dark.
    #[serde(default)]
    pub light_mode: bool,

    /// Append tracing output to this file. Logging is disabled when
    /// unset; stderr is never used while the terminal UI is active.
    pub log_file: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            light_mode: false,
            log_file: None,
        }
    }
}

fn default_url() -> String {
    "http://localhost:9090".into()
}
fn default_poll_interval_ms() -> u64 {
    2000
}
fn default_request_timeout_secs() -> u64 {
    5
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parses the configured backend URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        self.url.parse().map_err(|_| ConfigError::Validation {
            field: "url".into(),
            reason: format!("invalid URL: {}", self.url),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "poll_interval_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "request_timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        self.base_url()?;
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "vulpini", "vulpini").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vulpini");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load configuration from defaults, the TOML file, and VULPINI_* env
/// vars, in increasing precedence. A missing file is not an error.
pub fn load(path: Option<&Path>) -> Result<MonitorConfig, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(MonitorConfig::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("VULPINI_"));

    let config: MonitorConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = MonitorConfig::default();
        assert_eq!(config.url, "http://localhost:9090");
        assert_eq!(config.poll_interval(), Duration::from_millis(2000));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(!config.light_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_interval_rejected() {
        let config = MonitorConfig {
            poll_interval_ms: 0,
            ..MonitorConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { field, .. } if field == "poll_interval_ms"));
    }

    #[test]
    fn bad_url_rejected() {
        let config = MonitorConfig {
            url: "not a url".into(),
            ..MonitorConfig::default()
        };
        assert!(config.base_url().is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.poll_interval_ms, 2000);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "url = \"http://10.0.0.5:9191\"\npoll_interval_ms = 500\n")
            .unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.url, "http://10.0.0.5:9191");
        assert_eq!(config.poll_interval_ms, 500);
        // untouched keys keep their defaults
        assert_eq!(config.request_timeout_secs, 5);
    }
}
