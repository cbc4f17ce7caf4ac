//! Assertions for test bodies
//!
//! Every assertion returns `Result<(), AssertionError>`, so test bodies
//! propagate failures with `?`:
//!
//! ```ignore
//! fn adds(_: &mut Calc) -> TestResult {
//!     assert_equal(&4, &(2 + 2))?;
//!     assert_in_range(&0.5, &0.0, &1.0)?;
//!     Ok(())
//! }
//! ```
//!
//! Comparison, range, exception and timeout checks only.

mod polling;

pub use polling::{await_at_most, await_at_most_async, Poller, DEFAULT_POLL_INTERVAL};

use std::error::Error as StdError;
use std::fmt::Debug;
use thiserror::Error;

use crate::executor::failure::capture_panics;

/// Assertion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssertionError {
    #[error("Value is not equal, is: '{actual}', but should be: '{expected}'.")]
    NotEqual { expected: String, actual: String },

    #[error("Value is equal to: '{0}'.")]
    Equal(String),

    #[error("Value '{value}' is not less than '{max}'.")]
    NotLessThan { value: String, max: String },

    #[error("Value '{value}' is not larger than '{min}'.")]
    NotMoreThan { value: String, min: String },

    #[error("Value '{value}' is greater than '{max}'.")]
    GreaterThan { value: String, max: String },

    #[error("Value '{value}' is less than '{min}'.")]
    LessThan { value: String, min: String },

    #[error("Value '{value}' is not in range: [{min}-{max}].")]
    NotInRange { value: String, min: String, max: String },

    #[error("Value '{value}' is in range: [{min}-{max}].")]
    InRange { value: String, min: String, max: String },

    #[error("Value is false, but expected true.")]
    IsFalse,

    #[error("Value is true, but expected false.")]
    IsTrue,

    #[error("Value cannot be None.")]
    IsNone,

    #[error("Value should be None, but is: '{0}'.")]
    IsSome(String),

    #[error("Expected error of type '{expected}', but got '{actual}' instead.")]
    WrongError { expected: &'static str, actual: String },

    #[error("Expected error of type '{0}' was not raised.")]
    NotRaised(&'static str),

    #[error("Expected a panic, but the action completed.")]
    NoPanic,

    #[error("Assertion was not passed in time: {timeout_ms}ms. Reason: {reason}{}", format_trace(.trace))]
    Timeout {
        timeout_ms: u64,
        reason: String,
        trace: Vec<String>,
    },

    #[error("Polling task faulted: {0}")]
    TaskFaulted(String),
}

fn format_trace(trace: &[String]) -> String {
    trace.iter().map(|line| format!("\n{line}")).collect()
}

impl AssertionError {
    /// Diagnostic kind reported in the first failure line
    pub fn kind(&self) -> &'static str {
        match self {
            AssertionError::Timeout { .. } => "Timeout",
            AssertionError::TaskFaulted(_) => "TaskFault",
            _ => "AssertionFailure",
        }
    }
}

fn show<T: Debug>(value: &T) -> String {
    format!("{value:?}")
}

pub fn assert_equal<T: PartialEq + Debug>(expected: &T, actual: &T) -> Result<(), AssertionError> {
    if expected != actual {
        return Err(AssertionError::NotEqual {
            expected: show(expected),
            actual: show(actual),
        });
    }
    Ok(())
}

pub fn assert_not_equal<T: PartialEq + Debug>(
    unexpected: &T,
    actual: &T,
) -> Result<(), AssertionError> {
    if unexpected == actual {
        return Err(AssertionError::Equal(show(unexpected)));
    }
    Ok(())
}

pub fn assert_less_than<T: PartialOrd + Debug>(value: &T, max: &T) -> Result<(), AssertionError> {
    if !(value < max) {
        return Err(AssertionError::NotLessThan {
            value: show(value),
            max: show(max),
        });
    }
    Ok(())
}

pub fn assert_more_than<T: PartialOrd + Debug>(value: &T, min: &T) -> Result<(), AssertionError> {
    if !(value > min) {
        return Err(AssertionError::NotMoreThan {
            value: show(value),
            min: show(min),
        });
    }
    Ok(())
}

pub fn assert_equal_or_less_than<T: PartialOrd + Debug>(
    value: &T,
    max: &T,
) -> Result<(), AssertionError> {
    if !(value <= max) {
        return Err(AssertionError::GreaterThan {
            value: show(value),
            max: show(max),
        });
    }
    Ok(())
}

pub fn assert_equal_or_more_than<T: PartialOrd + Debug>(
    value: &T,
    min: &T,
) -> Result<(), AssertionError> {
    if !(value >= min) {
        return Err(AssertionError::LessThan {
            value: show(value),
            min: show(min),
        });
    }
    Ok(())
}

/// Inclusive range check
pub fn assert_in_range<T: PartialOrd + Debug>(
    value: &T,
    min: &T,
    max: &T,
) -> Result<(), AssertionError> {
    if !(value >= min && value <= max) {
        return Err(AssertionError::NotInRange {
            value: show(value),
            min: show(min),
            max: show(max),
        });
    }
    Ok(())
}

pub fn assert_not_in_range<T: PartialOrd + Debug>(
    value: &T,
    min: &T,
    max: &T,
) -> Result<(), AssertionError> {
    if value >= min && value <= max {
        return Err(AssertionError::InRange {
            value: show(value),
            min: show(min),
            max: show(max),
        });
    }
    Ok(())
}

pub fn assert_true(value: bool) -> Result<(), AssertionError> {
    if !value {
        return Err(AssertionError::IsFalse);
    }
    Ok(())
}

pub fn assert_false(value: bool) -> Result<(), AssertionError> {
    if value {
        return Err(AssertionError::IsTrue);
    }
    Ok(())
}

pub fn assert_some<T>(value: &Option<T>) -> Result<(), AssertionError> {
    if value.is_none() {
        return Err(AssertionError::IsNone);
    }
    Ok(())
}

pub fn assert_none<T: Debug>(value: &Option<T>) -> Result<(), AssertionError> {
    match value {
        Some(inner) => Err(AssertionError::IsSome(show(inner))),
        None => Ok(()),
    }
}

/// The action must fail with an error whose cause chain contains an `E`
pub fn assert_raises<E, F>(action: F) -> Result<(), AssertionError>
where
    E: StdError + Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<()>,
{
    let expected = std::any::type_name::<E>();
    match action() {
        Ok(()) => Err(AssertionError::NotRaised(expected)),
        Err(err) if err.chain().any(|cause| cause.is::<E>()) => Ok(()),
        Err(err) => Err(AssertionError::WrongError {
            expected,
            actual: err.root_cause().to_string(),
        }),
    }
}

/// The action must panic; the expected panic is not printed
pub fn assert_panics<R, F>(action: F) -> Result<(), AssertionError>
where
    F: FnOnce() -> R,
{
    match capture_panics(action) {
        Ok(_) => Err(AssertionError::NoPanic),
        Err(_) => Ok(()),
    }
}
