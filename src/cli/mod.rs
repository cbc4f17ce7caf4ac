//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

/// Minimal test runner with lifecycle hooks and polling assertions
#[derive(Parser, Debug)]
#[command(name = "simple-test")]
#[command(version)]
#[command(about = "Run registered test classes and report results")]
#[command(long_about = None)]
pub struct Args {
    /// Run only this test class
    #[arg(long = "test-class", value_name = "NAME")]
    pub test_class: Option<String>,

    /// Run only this method of the selected class (requires --test-class)
    #[arg(long = "test-method", value_name = "NAME")]
    pub test_method: Option<String>,

    /// List registered classes, hooks and methods without running them
    #[arg(short, long)]
    pub list: bool,

    /// Output format
    #[arg(short, long, value_parser = ["text", "json", "json-pretty"])]
    pub format: Option<String>,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
