//! Configuration Module
//!
//! Handles loading and managing client configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

/// Base URL used when `API_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default lifetime of a cached GET response in milliseconds.
pub const DEFAULT_CACHE_TTL_MS: u64 = 30_000;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL prepended to relative endpoints
    pub base_url: String,
    /// Default TTL in milliseconds for cached GET responses
    pub cache_ttl_ms: u64,
    /// Default request timeout in milliseconds
    pub timeout_ms: u64,
    /// File holding the persisted auth token, None if no data directory exists
    pub auth_token_path: Option<PathBuf>,
    /// Expired-entry sweep interval in seconds, 0 disables the sweeper
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Base URL for relative endpoints (default: http://localhost:8000/api)
    /// - `API_CACHE_TTL_MS` - Default GET cache lifetime in ms (default: 30000)
    /// - `API_TIMEOUT_MS` - Default request timeout in ms (default: 10000)
    /// - `AUTH_TOKEN_PATH` - Persisted token file (default: platform data dir)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            cache_ttl_ms: env::var("API_CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL_MS),
            timeout_ms: env::var("API_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            auth_token_path: env::var("AUTH_TOKEN_PATH")
                .ok()
                .map(PathBuf::from)
                .or_else(default_token_path),
            cleanup_interval: env::var("CACHE_CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Default cache lifetime as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Default request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            auth_token_path: default_token_path(),
            cleanup_interval: 60,
        }
    }
}

/// `<data dir>/backoffice/auth_token`, following the platform conventions.
fn default_token_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "backoffice")?;
    Some(dirs.data_dir().join("auth_token"))
}
