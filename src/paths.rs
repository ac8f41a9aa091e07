//! XDG-style path resolution for the configuration directory.
//!
//! XDG Base Directory conventions are preferred over OS-specific
//! locations so the bridge finds the same file on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "hover-translate";

/// Returns the configuration directory.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/hover-translate` if `XDG_CONFIG_HOME` is set and non-empty
/// 2. `~/.config/hover-translate` otherwise
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }
    dirs::home_dir()
        .map(|home| home.join(".config").join(APP_DIR))
        .context("Failed to determine home directory")
}

/// Returns the default config file path.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
