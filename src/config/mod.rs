//! Configuration module for SystemSearch
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Find and load settings: the env override first, then the usual places,
/// falling back to defaults. Environment variables always apply last.
pub fn load() -> Result<Settings> {
    let mut paths = Vec::new();
    if let Ok(path) = std::env::var("SYSTEMSEARCH_SETTINGS_PATH") {
        paths.push(PathBuf::from(path));
    }
    paths.push(PathBuf::from("settings.yml"));
    paths.push(PathBuf::from("config/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("systemsearch/settings.yml"));
    }

    load_first(&paths)
}

/// Load the first existing file of `paths`, or defaults if none exists
fn load_first(paths: &[PathBuf]) -> Result<Settings> {
    let mut settings = match paths.iter().find(|p| p.exists()) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}
