//! Shared utilities

pub mod logger;
pub mod timer;

/// Serializes tests that modify the process environment
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
