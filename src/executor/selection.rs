//! Run selection
//!
//! Decides whether a run covers every class, one class, or one method.

use std::fmt;

use crate::error::RunnerError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    All,
    Class(String),
    Method { class: String, method: String },
}

impl Selection {
    /// A method selector without a class selector is a usage error
    pub fn new(class: Option<String>, method: Option<String>) -> Result<Self, RunnerError> {
        match (class, method) {
            (None, None) => Ok(Selection::All),
            (Some(class), None) => Ok(Selection::Class(class)),
            (Some(class), Some(method)) => Ok(Selection::Method { class, method }),
            (None, Some(_)) => Err(RunnerError::MethodWithoutClass),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all test classes"),
            Selection::Class(class) => write!(f, "class {class}"),
            Selection::Method { class, method } => write!(f, "method {class}::{method}"),
        }
    }
}
