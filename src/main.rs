//! Simple Test - command-line runner
//!
//! Runs the bundled test suites and reports results.
//!
//! ## Usage
//!
//! ```bash
//! # Run every registered class
//! simple-test
//!
//! # Run one class
//! simple-test --test-class Tests2
//!
//! # Run a single method
//! simple-test --test-class Tests2 --test-method LambdaAssertionPass
//!
//! # List classes, hooks and methods
//! simple-test --list
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing::{debug, info, warn};

mod cli;

use cli::Args;
use simple_test::config::{self, env::EnvConfig, RunnerConfig};
use simple_test::output::{ColorMode, ConsolePrinter, OutputFormat, ResultFormatter, RunReport};
use simple_test::registry::HookKind;
use simple_test::utils::logger::{init_logger, LogLevel};
use simple_test::utils::timer::Timer;
use simple_test::{suites, Registry, RunSummary, RunnerError, Selection, TestRunner};

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;

// Synchronous on purpose: polling assertions start their own runtime.
fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            if let Some(runner_error) = e.downcast_ref::<RunnerError>() {
                if runner_error.is_usage() {
                    eprintln!("error: {runner_error}\n");
                    eprintln!("{}", Args::command().render_usage());
                    return ExitCode::from(EXIT_USAGE);
                }
            }
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let env = EnvConfig::load();
    let config = load_config(&args, &env)?;
    init_logger(config.log_level);
    for warning in &env.warnings {
        warn!("{}", warning);
    }
    debug!("Effective configuration: {:?}", config);

    let mut registry = Registry::new();
    suites::register_all(&mut registry).context("Failed to register test suites")?;

    if args.list {
        list_classes(&registry);
        return Ok(ExitCode::SUCCESS);
    }

    let selection = Selection::new(args.test_class, args.test_method)?;
    info!("Selected {}", selection);

    let passed = match config.format {
        OutputFormat::Text => run_text(&registry, &selection, &config)?,
        format => run_json(&registry, &selection, format)?,
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILURE)
    })
}

/// Resolve configuration: defaults < file < environment < flags
fn load_config(args: &Args, env: &EnvConfig) -> Result<RunnerConfig> {
    let path = args.config.clone().or_else(|| env.config_file.clone());
    let mut config = match path {
        Some(path) => RunnerConfig::load(&path)?,
        None => config::load_default()?,
    }
    .with_env(env);

    if let Some(format) = &args.format {
        config.format = OutputFormat::from_str(format)
            .with_context(|| format!("Unknown output format: {format}"))?;
    }
    if let Some(level) = &args.log_level {
        config.log_level = LogLevel::from_str(level)
            .with_context(|| format!("Unknown log level: {level}"))?;
    }
    if args.verbose {
        config.log_level = LogLevel::Debug;
    }
    if args.no_color {
        config.color = ColorMode::Never;
    }

    Ok(config)
}

fn run_text(registry: &Registry, selection: &Selection, config: &RunnerConfig) -> Result<bool> {
    let formatter = ResultFormatter::new()
        .with_color(config.color.enabled())
        .with_timing(config.show_timing);
    let mut printer = ConsolePrinter::stdout(formatter);

    let timer = Timer::start("run");
    let results = TestRunner::new(registry)
        .with_listener(&mut printer)
        .run(selection)?;
    let elapsed_ms = timer.stop_ms();

    printer
        .print_summary(&RunSummary::new(&results), elapsed_ms)
        .context("Failed to write summary")
}

fn run_json(registry: &Registry, selection: &Selection, format: OutputFormat) -> Result<bool> {
    let started_at = Utc::now();
    let timer = Timer::start("run");
    let results = TestRunner::new(registry).run(selection)?;
    let report = RunReport::new(started_at, timer.stop_ms(), results);

    let json = if format == OutputFormat::JsonPretty {
        report.to_json_pretty()
    } else {
        report.to_json()
    }
    .context("Failed to serialize report")?;
    println!("{json}");

    Ok(report.success)
}

fn list_classes(registry: &Registry) {
    println!("Registered Test Classes:");
    println!("{}", "=".repeat(40));

    for class in registry.discover_all() {
        println!("{}", class.name());

        let hooks: Vec<&str> = HookKind::all()
            .into_iter()
            .filter(|kind| class.has_hook(*kind))
            .map(|kind| kind.name())
            .collect();
        if !hooks.is_empty() {
            println!("  hooks: {}", hooks.join(", "));
        }

        for test in class.tests() {
            println!("  - {}", test.name());
        }
    }
}
