//! Test result models
//!
//! Defines outcomes and the immutable result records produced by each run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::registry::HookKind;

/// Fallback class message when the failure came from test methods only
pub const METHOD_FAILURE_MESSAGE: &str = "At least one of the methods has failed";

/// Outcome of a method or class run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Success,
    Fail,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::Fail => write!(f, "FAIL"),
        }
    }
}

/// Result of a single test method execution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodResult {
    pub name: String,
    pub outcome: Outcome,
    /// Diagnostic lines, empty on success
    pub messages: Vec<String>,
    pub elapsed_ms: u64,
}

impl MethodResult {
    pub fn success(name: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Success,
            messages: Vec::new(),
            elapsed_ms,
        }
    }

    pub fn fail(name: impl Into<String>, messages: Vec<String>, elapsed_ms: u64) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Fail,
            messages,
            elapsed_ms,
        }
    }
}

impl fmt::Display for MethodResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}ms]", self.outcome, self.name, self.elapsed_ms)?;
        if let Some(summary) = self.messages.first() {
            write!(f, " - {summary}")?;
        }
        Ok(())
    }
}

/// Result of running one test class
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassResult {
    pub name: String,
    pub outcome: Outcome,
    pub method_results: Vec<MethodResult>,
    pub elapsed_ms: u64,
    pub messages: Vec<String>,
    /// Lifecycle hook that aborted the run, if any
    pub failed_hook: Option<HookKind>,
}

impl ClassResult {
    /// Build a class result, deriving the outcome and fallback message
    pub fn new(
        name: impl Into<String>,
        method_results: Vec<MethodResult>,
        elapsed_ms: u64,
        hook_failure: Option<(HookKind, Vec<String>)>,
    ) -> Self {
        let any_method_failed = method_results
            .iter()
            .any(|result| result.outcome == Outcome::Fail);

        let (outcome, messages, failed_hook) = match hook_failure {
            Some((hook, messages)) => (Outcome::Fail, messages, Some(hook)),
            None if any_method_failed => (
                Outcome::Fail,
                vec![METHOD_FAILURE_MESSAGE.to_string()],
                None,
            ),
            None => (Outcome::Success, Vec::new(), None),
        };

        Self {
            name: name.into(),
            outcome,
            method_results,
            elapsed_ms,
            messages,
            failed_hook,
        }
    }

    /// The container could not be created, so nothing ran
    pub fn not_instantiated(name: impl Into<String>, elapsed_ms: u64, messages: Vec<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Fail,
            method_results: Vec::new(),
            elapsed_ms,
            messages,
            failed_hook: None,
        }
    }

    pub fn passed_methods(&self) -> usize {
        self.method_results
            .iter()
            .filter(|result| result.outcome.is_success())
            .count()
    }

    pub fn method(&self, name: &str) -> Option<&MethodResult> {
        self.method_results.iter().find(|result| result.name == name)
    }
}

impl fmt::Display for ClassResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} [{}ms] - {}/{} methods passed",
            self.outcome,
            self.name,
            self.elapsed_ms,
            self.passed_methods(),
            self.method_results.len()
        )?;
        for result in &self.method_results {
            writeln!(f, "  {result}")?;
        }
        Ok(())
    }
}

/// Pass/fail counts over a set of class results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub classes_total: usize,
    pub classes_passed: usize,
    pub methods_total: usize,
    pub methods_passed: usize,
}

impl RunSummary {
    pub fn new(results: &[ClassResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, class| {
            summary.classes_total += 1;
            if class.outcome.is_success() {
                summary.classes_passed += 1;
            }
            summary.methods_total += class.method_results.len();
            summary.methods_passed += class.passed_methods();
            summary
        })
    }

    /// Overall success iff every class succeeded
    pub fn is_success(&self) -> bool {
        self.classes_passed == self.classes_total
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Classes: {}/{} Methods: {}/{}",
            self.classes_passed, self.classes_total, self.methods_passed, self.methods_total
        )
    }
}
