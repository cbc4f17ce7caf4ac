//! Configuration module
//!
//! Handles loading and managing runner configuration.

pub mod env;
mod file;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::output::{ColorMode, OutputFormat};
use crate::utils::logger::LogLevel;

pub use file::{find, load_default, CONFIG_LOCATIONS};

/// Runner configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Result output format
    pub format: OutputFormat,

    /// ANSI color policy for text output
    pub color: ColorMode,

    /// Log verbosity
    pub log_level: LogLevel,

    /// Print elapsed time next to class results
    pub show_timing: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            log_level: LogLevel::Warn,
            show_timing: true,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if file::is_yaml_file(path) {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    /// Apply environment overrides on top of this configuration
    pub fn with_env(mut self, env: &env::EnvConfig) -> Self {
        if let Some(format) = env.format {
            self.format = format;
        }
        if let Some(color) = env.color {
            self.color = color;
        }
        if let Some(level) = env.log_level {
            self.log_level = level;
        }
        if let Some(show_timing) = env.show_timing {
            self.show_timing = show_timing;
        }
        self
    }
}
