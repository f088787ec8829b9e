//! Locator Configuration
//!
//! Persistent settings for the avdloc tool:
//! - Seeded property table (`user.home`, `ANDROID_SDK_HOME`, ...)
//! - Strict SDK-home checking
//! - Log level

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LocationError, Result};

/// Property name carrying the user's home directory
pub const USER_HOME_PROPERTY: &str = "user.home";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LocatorConfig {
    /// Process properties consulted before environment variables
    pub properties: BTreeMap<String, String>,
    /// Fail home resolution when ANDROID_SDK_HOME points at an SDK root
    pub strict_sdk_home: bool,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            properties: BTreeMap::new(),
            strict_sdk_home: false,
            log_level: "info".to_string(),
        }
    }
}

impl LocatorConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "avdloc", "avdloc").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub async fn load() -> Result<Self> {
        let config_file = Self::config_file()
            .ok_or_else(|| LocationError::Config("Cannot determine config path".into()))?;
        Self::load_from(&config_file).await
    }

    /// Load configuration from a file, falling back to defaults when it is missing
    pub async fn load_from(config_file: &Path) -> Result<Self> {
        if config_file.exists() {
            debug!("Loading config from {:?}", config_file);
            let contents = tokio::fs::read_to_string(config_file).await?;
            let config: LocatorConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            info!("Config file {:?} not found, using defaults", config_file);
            Ok(LocatorConfig::default())
        }
    }

    /// Property table with `user.home` filled in from the OS when not configured
    pub fn effective_properties(&self) -> BTreeMap<String, String> {
        let mut properties = self.properties.clone();
        if !properties.contains_key(USER_HOME_PROPERTY) {
            if let Some(home) = dirs::home_dir() {
                properties.insert(
                    USER_HOME_PROPERTY.to_string(),
                    home.to_string_lossy().to_string(),
                );
            }
        }
        properties
    }

    /// Apply `key=value` overrides on top of the configured properties
    pub fn apply_overrides<'a, I>(&mut self, overrides: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for entry in overrides {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| LocationError::Config(format!("Expected key=value, got '{}'", entry)))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(LocationError::Config(format!("Empty property name in '{}'", entry)));
            }
            self.properties.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}
