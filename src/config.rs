//! Host configuration file.
//!
//! ```toml
//! log_filter = "suburb_scout=info,suburb_search=debug"
//!
//! [search]
//! region = "Melbourne"
//! query_plan_mode = "targeted"
//! max_requests_per_window = 18
//!
//! [search.area_aliases]
//! "3030" = "point cook"
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use suburb_search::SearchConfig;

use crate::error::{Result, ScoutError};

/// Default tracing filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "suburb_scout=info,suburb_search=info";

/// Top-level configuration for the `suburb-scout` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// `tracing_subscriber::EnvFilter` directive string.
    pub log_filter: String,
    /// Search engine settings.
    pub search: SearchConfig,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            search: SearchConfig::default(),
        }
    }
}

impl ScoutConfig {
    /// Load configuration from a TOML file and validate the search section.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds invalid search settings.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| ScoutError::Config(e.to_string()))?;
        config.search.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Same as [`ScoutConfig::from_file`] for a file that exists.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| ScoutError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/suburb-scout/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("suburb-scout").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("suburb-scout")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/suburb-scout-config/config.toml")
        }
    }
}
