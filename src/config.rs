//! Configuration for the halfblank helpers
//!
//! Loads optional defaults from `~/.config/halfblank/config.toml`. Command-line
//! flags always win over the file, the file wins over built-in defaults.
//! The helpers never write this file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::geometry::Side;

/// Active size used when neither flag nor config sets one.
pub const DEFAULT_ACTIVE_SIZE: u32 = 1240;

/// Window / layer-surface name used when neither flag nor config sets one.
pub const DEFAULT_NAME: &str = "X1FOLD_HALFBLANK";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Edge to blank: "bottom", "top", "left", "right"
    pub side: Side,
    /// Pixels kept active along the split axis
    pub active_size: u32,
    /// Name advertised for the blanking window / layer surface
    pub name: String,
    pub drm: DrmConfig,
    pub x11: X11Config,
    pub wayland: WaylandConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            side: Side::Bottom,
            active_size: DEFAULT_ACTIVE_SIZE,
            name: DEFAULT_NAME.to_string(),
            drm: DrmConfig::default(),
            x11: X11Config::default(),
            wayland: WaylandConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                info!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!("Configuration loaded from {:?}", path);
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("halfblank").join("config.toml"))
    }
}

/// DRM plane-clip configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrmConfig {
    /// Device node, e.g. "/dev/dri/card1" (probed when unset)
    pub card: Option<PathBuf>,
    /// Connector name, e.g. "eDP-1" (first connected eDP when unset)
    pub connector: Option<String>,
    /// Visible height for `half`
    pub height: u32,
}

impl Default for DrmConfig {
    fn default() -> Self {
        Self {
            card: None,
            connector: None,
            height: DEFAULT_ACTIVE_SIZE,
        }
    }
}

/// X11 dock-window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct X11Config {
    /// Display to connect to, e.g. ":0" (uses $DISPLAY when unset)
    pub display: Option<String>,
    /// Pointer clamp cadence in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for X11Config {
    fn default() -> Self {
        Self {
            display: None,
            poll_interval_ms: 100,
        }
    }
}

/// Wayland layer-surface configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaylandConfig {
    /// Upper bound for one poll() on the display socket, in milliseconds
    pub poll_timeout_ms: u16,
}

impl Default for WaylandConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: 1000,
        }
    }
}
