//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

use crate::output::{ColorMode, OutputFormat};
use crate::utils::logger::LogLevel;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SIMPLE_TEST";

/// Configuration from environment variables
///
/// Unparseable values are ignored and described in `warnings`, which the
/// caller logs once logging is up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// SIMPLE_TEST_FORMAT
    pub format: Option<OutputFormat>,
    /// SIMPLE_TEST_COLOR
    pub color: Option<ColorMode>,
    /// SIMPLE_TEST_LOG
    pub log_level: Option<LogLevel>,
    /// SIMPLE_TEST_TIMING
    pub show_timing: Option<bool>,
    /// SIMPLE_TEST_CONFIG
    pub config_file: Option<PathBuf>,
    /// Ignored values
    pub warnings: Vec<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        let mut warnings = Vec::new();
        Self {
            format: get_env_with("FORMAT", OutputFormat::from_str, &mut warnings),
            color: get_env_with("COLOR", ColorMode::from_str, &mut warnings),
            log_level: get_env_with("LOG", LogLevel::from_str, &mut warnings),
            show_timing: get_env_bool("TIMING"),
            config_file: get_env("CONFIG").map(PathBuf::from),
            warnings,
        }
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

fn get_env_with<T>(
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let raw = get_env(name)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        warnings.push(format!("Ignoring invalid {ENV_PREFIX}_{name}: {raw}"));
    }
    parsed
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}
