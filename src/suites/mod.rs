//! Bundled demonstration suites
//!
//! `Tests` exercises every lifecycle hook alongside passing and failing
//! assertions; `Tests2` covers panic assertions and polling.

mod basic;
mod lambda;

use crate::error::RunnerError;
use crate::registry::Registry;

pub use basic::Tests;
pub use lambda::Tests2;

/// Register every bundled suite in declaration order
pub fn register_all(registry: &mut Registry) -> Result<(), RunnerError> {
    registry.register(basic::test_class())?;
    registry.register(lambda::test_class())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{Selection, TestRunner};
    use crate::models::{Outcome, METHOD_FAILURE_MESSAGE};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        registry
    }

    #[test]
    fn test_register_all() {
        let registry = registry();
        let names: Vec<_> = registry
            .discover_all()
            .iter()
            .map(|class| class.name().to_string())
            .collect();
        assert_eq!(names, vec!["Tests", "Tests2"]);

        let mut registry = registry;
        assert!(register_all(&mut registry).is_err());
    }

    #[test]
    fn test_failing_method_is_isolated() {
        let registry = registry();
        let result = TestRunner::new(&registry).run_class("Tests").unwrap();

        assert_eq!(result.outcome, Outcome::Fail);
        assert_eq!(result.messages, vec![METHOD_FAILURE_MESSAGE.to_string()]);
        assert_eq!(result.method_results.len(), 2);
        assert_eq!(
            result.method("AssertionTestsPass").unwrap().outcome,
            Outcome::Success
        );

        let failed = result.method("AssertionTestsFail").unwrap();
        assert_eq!(failed.outcome, Outcome::Fail);
        assert!(failed.messages[0].starts_with("AssertionFailure: "));
    }

    #[test]
    fn test_single_method_selection() {
        let registry = registry();
        let selection = Selection::new(
            Some("Tests2".to_string()),
            Some("LambdaAssertionPass".to_string()),
        )
        .unwrap();
        let results = TestRunner::new(&registry).run(&selection).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, Outcome::Success);
        assert_eq!(results[0].method_results.len(), 1);
        assert_eq!(results[0].method_results[0].name, "LambdaAssertionPass");
    }

    #[test]
    fn test_polling_failure_reports_last_error() {
        let registry = registry();
        let result = TestRunner::new(&registry)
            .run_method("Tests2", "LambdaAssertionPassFail1")
            .unwrap();

        let failed = result.method("LambdaAssertionPassFail1").unwrap();
        assert_eq!(failed.outcome, Outcome::Fail);
        assert!(failed.messages[0].starts_with("Timeout: Assertion was not passed in time: 50ms."));
        assert!(failed.messages[0].contains("Example endless exception."));
    }

    #[test]
    fn test_unknown_selection() {
        let registry = registry();
        let mut runner = TestRunner::new(&registry);

        assert_eq!(
            runner.run_class("Missing").unwrap_err(),
            RunnerError::UnknownClass("Missing".to_string())
        );
        assert!(matches!(
            runner.run_method("Tests2", "Missing"),
            Err(RunnerError::UnknownMethod { .. })
        ));
    }
}
