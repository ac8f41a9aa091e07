//! Subcommand implementations.

use anyhow::Result;
use std::path::Path;

use crate::config::{ConfigManager, Settings};

/// JSON-lines editor bridge.
pub mod serve;

/// One-shot translation.
pub mod translate;

/// Loads `[comment_translate]` from `path`, or from the default location.
fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    Ok(manager.load_or_default()?.comment_translate)
}
