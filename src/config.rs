// src/config.rs

//! Defines the configuration structures for display windows and the demo
//! driver.
//!
//! Configuration is read from a JSON file whose path is given by the
//! `WINDOW_WORKER_CONFIG` environment variable. Every field has a default,
//! so a partial file (or no file at all) is fine.

use crate::display::messages::{Position, WindowFlags};
use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV_VAR: &str = "WINDOW_WORKER_CONFIG";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Settings applied to every window at construction.
    pub window: WindowConfig,
    /// Settings for the bundled demo binary.
    pub demo: DemoConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load from `WINDOW_WORKER_CONFIG` if set, otherwise defaults. A broken
    /// file is logged and ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            info!("Config: {} not set, using defaults", CONFIG_ENV_VAR);
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(config) => {
                info!("Config: loaded {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                warn!("Config: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }
}

// --- Window Configuration ---

/// Initial state of a `DisplayWindow`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Whether frames are shown as soon as they arrive.
    pub visible: bool,
    /// Flags used when the surface is realized.
    pub flags: WindowFlags,
    /// Where the surface is placed when realized.
    pub position: Position,
    /// Bounded wait for the event-pump tick after each render.
    pub pump_interval_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            visible: true,
            flags: WindowFlags::empty(),
            position: Position::default(),
            pump_interval_ms: 1,
        }
    }
}

// --- Demo Configuration ---

/// Grid of windows fed by one producer thread each.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    pub windows: usize,
    /// Windows per row when laying out the grid.
    pub columns: usize,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_interval_ms: u64,
    pub run_for_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            windows: 6,
            columns: 4,
            frame_width: 200,
            frame_height: 200,
            frame_interval_ms: 10,
            run_for_ms: 2000,
        }
    }
}
