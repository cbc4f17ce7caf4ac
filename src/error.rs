//! Runner errors
//!
//! Errors surfaced to the caller of the engine rather than recorded as test
//! results: bad selections and invalid registrations.

use thiserror::Error;

use crate::registry::HookKind;

/// Errors returned by the registry, the selection layer and the runner
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error("Unknown test class: {0}")]
    UnknownClass(String),

    #[error("Unknown test method '{method}' in class '{class}'")]
    UnknownMethod { class: String, method: String },

    #[error("A test method was selected without a test class")]
    MethodWithoutClass,

    #[error("Test class '{0}' is already registered")]
    DuplicateClass(String),

    #[error("Test class '{class}' declares more than one {kind} hook")]
    DuplicateHook { class: String, kind: HookKind },

    #[error("Test class '{class}' declares test method '{method}' more than once")]
    DuplicateMethod { class: String, method: String },
}

impl RunnerError {
    /// Whether the error stems from how the runner was invoked
    ///
    /// Usage errors are reported with usage guidance instead of as failures.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            RunnerError::UnknownClass(_)
                | RunnerError::UnknownMethod { .. }
                | RunnerError::MethodWithoutClass
        )
    }
}
