//! Configuration module for keychord.
//!
//! Handles loading and managing configuration from:
//! - Default values
//! - Config file (~/.config/keychord/config.toml)
//! - The `KEYCHORD_CONFIG_DIR` environment variable

mod keymap;
mod schema;

pub use keymap::{KeyBinding, Keymap};
pub use schema::{Config, CustomKeyBinding, EditorConfig, KeymapConfig};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Returns the config directory path.
///
/// Checks `KEYCHORD_CONFIG_DIR` environment variable first, then falls back
/// to the system default (~/.config/keychord on Linux).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("KEYCHORD_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|p| p.join("keychord"))
}

/// Returns the default config file path (~/.config/keychord/config.toml)
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Load configuration from the default path or return defaults
pub fn load_config() -> Result<Config> {
    if let Some(path) = config_path() {
        if path.exists() {
            return load_config_from(&path);
        }
    }
    Ok(Config::default())
}

/// Load configuration from a specific path
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
