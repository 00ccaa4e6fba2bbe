//! Configuration module
//!
//! Handles loading and saving screenflash configuration. Flash style lives
//! in the separate settings store; this file only covers how the monitor and
//! the flash coordinator run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::flash::{FlashMode, FlashOptions, DEFAULT_CURSOR_SIZE};
use crate::settings::FileStore;
use crate::transition::MonitorOptions;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Pointer polling
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Overlay scheduling
    #[serde(default)]
    pub flash: FlashConfig,

    /// Where the flash style is persisted
    #[serde(default)]
    pub settings: StyleStoreConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Pointer sampling interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Display set refresh interval in milliseconds
    #[serde(default = "default_topology_refresh")]
    pub topology_refresh_ms: u64,

    /// Presentations produced per transition
    #[serde(default)]
    pub flash_mode: FlashMode,
}

fn default_poll_interval() -> u64 {
    20
}

fn default_topology_refresh() -> u64 {
    1000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            topology_refresh_ms: default_topology_refresh(),
            flash_mode: FlashMode::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashConfig {
    /// Delay before the edge flash in `both` mode
    #[serde(default = "default_stagger")]
    pub stagger_ms: u64,

    /// Side of the square cursor overlay
    #[serde(default = "default_cursor_size")]
    pub cursor_size: f64,

    /// Fade frame interval for the log renderer
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
}

fn default_stagger() -> u64 {
    50
}

fn default_cursor_size() -> f64 {
    DEFAULT_CURSOR_SIZE
}

fn default_frame_interval() -> u64 {
    16
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            stagger_ms: default_stagger(),
            cursor_size: default_cursor_size(),
            frame_interval_ms: default_frame_interval(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleStoreConfig {
    /// Style settings file (defaults to the user config directory)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load_default() -> ConfigResult<Self> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("screenflash/config.toml")),
            Some(PathBuf::from("./screenflash.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the monitor cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.monitor.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "monitor.poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.monitor.topology_refresh_ms == 0 {
            return Err(ConfigError::Invalid(
                "monitor.topology_refresh_ms must be positive".to_string(),
            ));
        }
        if !(self.flash.cursor_size.is_finite() && self.flash.cursor_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "flash.cursor_size must be positive, got {}",
                self.flash.cursor_size
            )));
        }
        Ok(())
    }

    pub fn monitor_options(&self) -> MonitorOptions {
        MonitorOptions {
            poll_interval: Duration::from_millis(self.monitor.poll_interval_ms),
            topology_refresh: Duration::from_millis(self.monitor.topology_refresh_ms),
        }
    }

    pub fn flash_options(&self) -> FlashOptions {
        FlashOptions {
            stagger: Duration::from_millis(self.flash.stagger_ms),
            cursor_size: self.flash.cursor_size,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.flash.frame_interval_ms)
    }

    /// Style settings file, falling back to the user config directory
    pub fn style_store_path(&self) -> Option<PathBuf> {
        self.settings.path.clone().or_else(FileStore::default_path)
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config() -> ConfigResult<String> {
    let config = Config {
        monitor: MonitorConfig {
            flash_mode: FlashMode::Both,
            ..Default::default()
        },
        settings: StyleStoreConfig {
            path: FileStore::default_path(),
        },
        ..Default::default()
    };

    Ok(toml::to_string_pretty(&config)?)
}
