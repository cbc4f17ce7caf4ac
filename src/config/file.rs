//! Configuration file discovery

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::RunnerConfig;

/// Configuration file locations (in order of precedence)
pub const CONFIG_LOCATIONS: &[&str] = &[
    "./simple-test.yaml",
    "./simple-test.yml",
    "./simple-test.json",
    "~/.config/simple-test/config.yaml",
];

/// Find configuration file in standard locations
pub fn find() -> Option<PathBuf> {
    CONFIG_LOCATIONS
        .iter()
        .map(|location| expand_path(location))
        .find(|path| path.exists())
}

/// Load configuration from the first standard location, or defaults
pub fn load_default() -> Result<RunnerConfig> {
    match find() {
        Some(path) => {
            tracing::debug!("Using config file {}", path.display());
            RunnerConfig::load(&path)
        }
        None => Ok(RunnerConfig::default()),
    }
}

/// Expand `~/` to the home directory
pub(crate) fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
pub(crate) fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
