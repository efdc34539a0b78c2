//! Editor configuration.
//!
//! Configuration is read from TOML. Every section carries
//! `#[serde(default)]`, so a file only needs the keys it wants to change
//! and older files keep working when new keys appear.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Session file name, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = "editor_session.json";

/// Main editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor behavior settings
    pub editor: EditorConfig,

    /// Session persistence settings
    pub session: SessionConfig,

    /// UI appearance settings
    pub ui: UiConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults
    /// when the file is missing or broken.
    pub fn load() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_or_default(&path),
            Err(e) => {
                tracing::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from `path`; a missing file yields defaults and any
    /// other failure is logged and yields defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("plume").join("config.toml"))
    }

    /// Saves the config to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Editor behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Start with auto-save enabled
    pub auto_save: bool,

    /// Seconds between auto-save attempts
    pub auto_save_interval_secs: u64,

    /// Highlight syntax by default
    pub syntax_highlighting: bool,
}

impl EditorConfig {
    /// Returns the auto-save interval, never shorter than one second.
    pub fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(self.auto_save_interval_secs.max(1))
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            auto_save: false,
            auto_save_interval_secs: 300,
            syntax_highlighting: true,
        }
    }
}

/// Session persistence configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Restore and record sessions
    pub enabled: bool,

    /// Session file location
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

/// UI appearance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Font family
    pub font_family: String,

    /// Font size in points
    pub font_size: u32,

    /// Start in dark mode
    pub dark_mode: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_family: crate::session::DEFAULT_FONT.to_string(),
            font_size: crate::session::DEFAULT_FONT_SIZE,
            dark_mode: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
