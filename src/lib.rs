//! Simple Test - a minimal test execution framework
//!
//! Test containers register their lifecycle hooks and test methods with a
//! [`Registry`]. A [`TestRunner`] executes the selected classes, isolating
//! each method failure and honoring `BeforeAll`/`AfterAll`/`BeforeEach`/
//! `AfterEach` hooks, and streams results to a [`RunListener`].
//!
//! ```no_run
//! use simple_test::assertions::assert_equal;
//! use simple_test::{Registry, TestClass, TestRunner};
//!
//! #[derive(Default)]
//! struct Arithmetic;
//!
//! let mut registry = Registry::new();
//! registry
//!     .register(TestClass::<Arithmetic>::new("Arithmetic").test("Adds", |_| {
//!         assert_equal(&4, &(2 + 2))?;
//!         Ok(())
//!     }))
//!     .unwrap();
//!
//! let results = TestRunner::new(&registry).run_all();
//! assert!(results[0].outcome.is_success());
//! ```

pub mod assertions;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod output;
pub mod registry;
pub mod suites;
pub mod utils;

pub use error::RunnerError;
pub use executor::{RunListener, Selection, TestRunner};
pub use models::{ClassResult, MethodResult, Outcome, RunSummary};
pub use registry::{HookKind, Registry, TestClass, TestResult};
