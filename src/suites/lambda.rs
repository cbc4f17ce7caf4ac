//! Panic and polling assertions

use anyhow::bail;
use std::hint::black_box;
use std::thread;
use std::time::Duration;

use crate::assertions::{assert_panics, await_at_most};
use crate::registry::{TestClass, TestResult};

#[derive(Debug, Default)]
pub struct Tests2;

impl Tests2 {
    fn lambda_assertion_pass(&mut self) -> TestResult {
        assert_panics(|| {
            let divisor: i32 = black_box(0);
            println!("You will never see this printed: {}", 1 / divisor);
        })?;
        await_at_most(Duration::from_millis(1000), || {
            thread::sleep(Duration::from_millis(10));
            Ok(())
        })?;
        Ok(())
    }

    fn lambda_assertion_pass_fail(&mut self) -> TestResult {
        await_at_most(Duration::from_millis(50), || {
            bail!("Example endless exception.")
        })?;
        Ok(())
    }
}

pub(super) fn test_class() -> TestClass<Tests2> {
    TestClass::new("Tests2")
        .test("LambdaAssertionPass", Tests2::lambda_assertion_pass)
        .test("LambdaAssertionPassFail1", Tests2::lambda_assertion_pass_fail)
}
