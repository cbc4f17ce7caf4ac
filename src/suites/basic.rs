//! Lifecycle hooks and plain assertions

use tracing::info;

use crate::assertions::*;
use crate::registry::{TestClass, TestResult};

/// Counts hook invocations over one class run
#[derive(Debug, Default)]
pub struct Tests {
    methods_started: u32,
}

impl Tests {
    fn before_all(&mut self) -> TestResult {
        info!("BeforeAll runs before all methods in a class");
        Ok(())
    }

    fn before_each(&mut self) -> TestResult {
        self.methods_started += 1;
        info!("BeforeEach runs before each method (#{})", self.methods_started);
        Ok(())
    }

    fn after_each(&mut self) -> TestResult {
        info!("AfterEach runs after each method");
        Ok(())
    }

    fn after_all(&mut self) -> TestResult {
        info!(
            "AfterAll runs after all methods, {} started",
            self.methods_started
        );
        Ok(())
    }

    fn assertion_tests_pass(&mut self) -> TestResult {
        assert_equal(&0, &0)?;
        assert_equal(&"a", &"a")?;
        assert_not_equal(&"a1", &"a")?;
        assert_more_than(&1, &0)?;
        assert_equal_or_more_than(&0, &0)?;
        assert_equal_or_more_than(&1, &0)?;
        assert_less_than(&0, &1)?;
        assert_equal_or_less_than(&0, &0)?;
        assert_equal_or_less_than(&0, &1)?;
        assert_in_range(&0, &-1, &1)?;
        assert_not_in_range(&2, &-1, &1)?;
        assert_true(self.methods_started > 0)?;

        let mut maybe: Option<i32> = None;
        assert_none(&maybe)?;
        maybe = Some(1);
        assert_some(&maybe)?;
        Ok(())
    }

    fn assertion_tests_fail(&mut self) -> TestResult {
        assert_equal(&0, &1)?;
        Ok(())
    }
}

pub(super) fn test_class() -> TestClass<Tests> {
    TestClass::new("Tests")
        .before_all(Tests::before_all)
        .before_each(Tests::before_each)
        .after_all(Tests::after_all)
        .after_each(Tests::after_each)
        .test("AssertionTestsPass", Tests::assertion_tests_pass)
        .test("AssertionTestsFail", Tests::assertion_tests_fail)
}
