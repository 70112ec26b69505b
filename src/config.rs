//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default file the cache settings are saved to.
pub const DEFAULT_SETTINGS_PATH: &str = "qr_cache_settings.json";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold, used until settings are saved
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-entry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Where cache settings are persisted; None keeps them in memory
    pub settings_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000, 0 = unbounded)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `SETTINGS_PATH` - Settings file (default: `qr_cache_settings.json`,
    ///   empty = do not persist)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            settings_path: match env::var("SETTINGS_PATH") {
                Ok(path) if path.is_empty() => None,
                Ok(path) => Some(PathBuf::from(path)),
                Err(_) => defaults.settings_path,
            },
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            server_port: 3000,
            cleanup_interval: 300,
            settings_path: Some(PathBuf::from(DEFAULT_SETTINGS_PATH)),
        }
    }
}
