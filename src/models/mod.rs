//! Data models for test runs
//!
//! Result records produced by the execution engine.

mod test_result;

pub use test_result::{ClassResult, MethodResult, Outcome, RunSummary, METHOD_FAILURE_MESSAGE};
