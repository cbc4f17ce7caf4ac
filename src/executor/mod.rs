//! Test execution engine
//!
//! Runs selected test classes through their lifecycle, isolates method
//! failures and streams results to a listener.

pub mod failure;
mod listener;
mod runner;
mod selection;

pub use failure::Failure;
pub use listener::{NoopListener, RunListener};
pub use runner::TestRunner;
pub use selection::Selection;
