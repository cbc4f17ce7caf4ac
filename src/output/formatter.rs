//! Output formatters for test results
//!
//! Renders class and method results as console text, optionally with ANSI
//! colors.

use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::models::{ClassResult, MethodResult, Outcome, RunSummary};
use crate::utils::timer::format_millis;

const PREFIX_RUN: &str = "[RUN]";
const PREFIX_OK: &str = "[OK ]";
const PREFIX_ERROR: &str = "[ERR]";
const RULE: &str = "----------------------";

const NORMAL: &str = "\x1b[39m";
const RED: &str = "\x1b[91m";
const GREEN: &str = "\x1b[92m";
const BLUE: &str = "\x1b[94m";
const GREY: &str = "\x1b[97m";

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }
}

/// When to colorize text output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(ColorMode::Auto),
            "always" | "on" => Some(ColorMode::Always),
            "never" | "off" => Some(ColorMode::Never),
            _ => None,
        }
    }

    /// Auto colors only when stdout is a terminal
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Auto => std::io::stdout().is_terminal(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Result formatter
#[derive(Clone, Debug)]
pub struct ResultFormatter {
    colorize: bool,
    show_timing: bool,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter {
    pub fn new() -> Self {
        Self {
            colorize: true,
            show_timing: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    pub fn with_color(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn with_timing(mut self, show_timing: bool) -> Self {
        self.show_timing = show_timing;
        self
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.colorize {
            format!("{color}{text}{NORMAL}")
        } else {
            text.to_string()
        }
    }

    fn timing(&self, millis: u64) -> String {
        if self.show_timing {
            format!(" {}", self.paint(&format_millis(millis), GREY))
        } else {
            String::new()
        }
    }

    /// `[RUN] <class>`
    pub fn format_class_begin(&self, class_name: &str) -> String {
        format!("{} {}", self.paint(PREFIX_RUN, BLUE), class_name)
    }

    /// `-> [OK ] <method>` or `-> [ERR] <method>` followed by diagnostics
    pub fn format_method(&self, result: &MethodResult) -> String {
        match result.outcome {
            Outcome::Success => format!("-> {} {}", self.paint(PREFIX_OK, GREEN), result.name),
            Outcome::Fail => {
                let mut output = format!("-> {} {}", self.paint(PREFIX_ERROR, RED), result.name);
                for line in &result.messages {
                    output.push('\n');
                    output.push_str(line);
                }
                output
            }
        }
    }

    /// `[OK ] <class> <time>` or `[ERR] <class> <time>` followed by messages
    pub fn format_class(&self, result: &ClassResult) -> String {
        match result.outcome {
            Outcome::Success => format!(
                "{} {}{}",
                self.paint(PREFIX_OK, GREEN),
                result.name,
                self.timing(result.elapsed_ms)
            ),
            Outcome::Fail => {
                let mut output = format!(
                    "{} {}{}",
                    self.paint(PREFIX_ERROR, RED),
                    result.name,
                    self.timing(result.elapsed_ms)
                );
                for line in &result.messages {
                    output.push('\n');
                    output.push_str(line);
                }
                output
            }
        }
    }

    /// Closing summary block of a run
    pub fn format_summary(&self, summary: &RunSummary, elapsed_ms: u64) -> String {
        let verdict = if summary.is_success() {
            self.paint("PASS", GREEN)
        } else {
            self.paint("FAIL", RED)
        };

        format!(
            "{RULE}\n{verdict} {summary}\nTook {}\n{RULE}",
            format_millis(elapsed_ms)
        )
    }
}
