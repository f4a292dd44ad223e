//! Engine configuration module
//!
//! Provides configuration types for the sync engine. Values come from three
//! places, in increasing precedence: built-in defaults, a TOML file, and
//! `AUDITSYNC_*` environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default remote API base URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Default per-remote-call timeout, in seconds
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Sync engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the remote audit backend
    pub server_url: String,
    /// Bearer token for the remote backend, if any
    pub api_token: Option<String>,
    /// Location of the local SQLite mirror; platform data dir when unset
    pub db_path: Option<PathBuf>,
    /// Per-remote-call timeout in seconds
    pub remote_timeout_secs: u64,
    /// Interval between periodic drain attempts in seconds, if enabled
    pub drain_interval_secs: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let server_url = std::env::var("AUDITSYNC_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let api_token = std::env::var("AUDITSYNC_API_TOKEN").ok();
        let db_path = std::env::var("AUDITSYNC_DB_PATH").ok().map(PathBuf::from);
        Self {
            server_url,
            api_token,
            db_path,
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
            drain_interval_secs: None,
        }
    }
}

impl SyncConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new SyncConfigBuilder
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Parse a configuration from a TOML string
    ///
    /// Missing keys fall back to the same defaults as [`SyncConfig::default`].
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&raw)
    }

    /// Get the full URL for a remote API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), path)
    }

    /// Per-remote-call timeout
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    /// Interval between periodic drain attempts, if configured
    pub fn drain_interval(&self) -> Option<Duration> {
        self.drain_interval_secs.map(Duration::from_secs)
    }

    /// Resolve the local database file path
    ///
    /// Uses the configured path when set, otherwise the platform data
    /// directory (falling back to the temp dir when none is available).
    pub fn database_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => path.clone(),
            None => {
                let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
                path.push("auditsync");
                path.push("local.db");
                path
            }
        }
    }
}

/// Builder for SyncConfig
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    server_url: Option<String>,
    api_token: Option<String>,
    db_path: Option<PathBuf>,
    remote_timeout_secs: Option<u64>,
    drain_interval_secs: Option<u64>,
}

impl SyncConfigBuilder {
    /// Set the remote backend base URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the bearer token
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the local database file path
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    /// Set the per-remote-call timeout
    pub fn remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Enable periodic drain attempts at the given interval
    pub fn drain_interval(mut self, interval: Duration) -> Self {
        self.drain_interval_secs = Some(interval.as_secs());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<SyncConfig, ConfigError> {
        let defaults = SyncConfig::default();
        let server_url = self.server_url.unwrap_or(defaults.server_url);
        if server_url.is_empty() {
            return Err(ConfigError::MissingValue("server_url"));
        }
        Ok(SyncConfig {
            server_url,
            api_token: self.api_token.or(defaults.api_token),
            db_path: self.db_path.or(defaults.db_path),
            remote_timeout_secs: self
                .remote_timeout_secs
                .unwrap_or(defaults.remote_timeout_secs),
            drain_interval_secs: self.drain_interval_secs,
        })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file error: {0}")]
    Io(String),
    #[error("invalid config: {0}")]
    Parse(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
