//! Console printer
//!
//! Streams results to a writer while the runner executes.

use std::io::{self, Write};

use crate::executor::RunListener;
use crate::models::{ClassResult, MethodResult, RunSummary};

use super::formatter::ResultFormatter;

/// Listener that writes formatted results as they arrive
pub struct ConsolePrinter<W: Write> {
    out: W,
    formatter: ResultFormatter,
}

impl ConsolePrinter<io::Stdout> {
    pub fn stdout(formatter: ResultFormatter) -> Self {
        Self::new(io::stdout(), formatter)
    }
}

impl<W: Write> ConsolePrinter<W> {
    pub fn new(out: W, formatter: ResultFormatter) -> Self {
        Self { out, formatter }
    }

    /// Print the closing summary, returning whether the run passed
    pub fn print_summary(&mut self, summary: &RunSummary, elapsed_ms: u64) -> io::Result<bool> {
        writeln!(self.out, "{}", self.formatter.format_summary(summary, elapsed_ms))?;
        self.out.flush()?;
        Ok(summary.is_success())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        // A broken stdout must not abort the run
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }
}

impl<W: Write> RunListener for ConsolePrinter<W> {
    fn class_started(&mut self, class_name: &str) {
        let line = self.formatter.format_class_begin(class_name);
        self.emit(&line);
    }

    fn method_finished(&mut self, result: &MethodResult) {
        let line = self.formatter.format_method(result);
        self.emit(&line);
    }

    fn class_finished(&mut self, result: &ClassResult) {
        let line = self.formatter.format_class(result);
        self.emit(&line);
    }
}
