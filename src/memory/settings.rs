//! Cache Settings
//!
//! The three user-facing cache switches and their JSON file persistence.
//! These settings are the only state that outlives a restart.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// User-facing cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// When false, reads return nothing and writes are ignored
    pub cache_enabled: bool,
    /// When true, the periodic sweep removes expired entries
    pub auto_cleanup: bool,
    /// Maximum number of cached entries (0 = unbounded)
    pub max_cache_size: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            auto_cleanup: true,
            max_cache_size: 1000,
        }
    }
}

/// Partial settings change; absent fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub cache_enabled: Option<bool>,
    #[serde(default)]
    pub auto_cleanup: Option<bool>,
    #[serde(default)]
    pub max_cache_size: Option<usize>,
}

// == Settings File ==
/// Location settings are saved to. `None` keeps settings in memory only.
#[derive(Debug, Clone, Default)]
pub struct SettingsFile {
    path: Option<PathBuf>,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A settings file that never touches disk.
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads saved settings.
    ///
    /// Returns None when nothing was saved yet or the file cannot be parsed.
    pub fn load(&self) -> Option<CacheSettings> {
        let path = self.path.as_ref()?;
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No saved settings at {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Writes settings as pretty JSON.
    pub fn save(&self, settings: &CacheSettings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(path, json)?;
        debug!("Saved cache settings to {}", path.display());
        Ok(())
    }
}
