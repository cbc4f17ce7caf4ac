//! Test execution runner
//!
//! Runs registered test classes through their lifecycle:
//! `BeforeAll`, then `BeforeEach` / test / `AfterEach` per method, then
//! `AfterAll`. Classes and methods run strictly one after another on the
//! calling thread.

use std::any::Any;
use tracing::{debug, info, warn};

use super::failure::{self, Failure};
use super::listener::{NoopListener, RunListener};
use super::selection::Selection;
use crate::error::RunnerError;
use crate::models::{ClassResult, MethodResult, RunSummary};
use crate::registry::{HookKind, Registry, TestClassDescriptor, TestUnit};
use crate::utils::timer::Timer;

/// A lifecycle hook failure; aborts the rest of the class run
struct HookFailure {
    kind: HookKind,
    failure: Failure,
}

impl HookFailure {
    fn into_messages(self) -> (HookKind, Vec<String>) {
        let mut lines = self.failure.lines();
        if let Some(first) = lines.first_mut() {
            *first = format!("LifecycleHookFailure({}): {first}", self.kind);
        }
        (self.kind, lines)
    }
}

/// Test runner over a registry
pub struct TestRunner<'r> {
    registry: &'r Registry,
    listener: Box<dyn RunListener + 'r>,
}

impl<'r> TestRunner<'r> {
    /// Create a new test runner
    pub fn new(registry: &'r Registry) -> Self {
        failure::install_panic_hook();
        Self {
            registry,
            listener: Box::new(NoopListener),
        }
    }

    /// Stream results to a listener
    pub fn with_listener(mut self, listener: impl RunListener + 'r) -> Self {
        self.listener = Box::new(listener);
        self
    }

    /// Run whatever the selection names
    pub fn run(&mut self, selection: &Selection) -> Result<Vec<ClassResult>, RunnerError> {
        debug!("Running {}", selection);
        match selection {
            Selection::All => Ok(self.run_all()),
            Selection::Class(class) => Ok(vec![self.run_class(class)?]),
            Selection::Method { class, method } => Ok(vec![self.run_method(class, method)?]),
        }
    }

    /// Run every registered class
    pub fn run_all(&mut self) -> Vec<ClassResult> {
        let classes = self.registry.discover_all();
        info!("Running {} test classes", classes.len());

        let results: Vec<ClassResult> = classes
            .iter()
            .map(|class| {
                let units: Vec<&TestUnit> = class.tests().iter().collect();
                self.run_units(class, &units)
            })
            .collect();

        let summary = RunSummary::new(&results);
        info!("Test run completed - {}", summary);
        results
    }

    /// Run all methods of one class
    pub fn run_class(&mut self, name: &str) -> Result<ClassResult, RunnerError> {
        let class = self.registry.find_class(name)?;
        let units: Vec<&TestUnit> = class.tests().iter().collect();
        Ok(self.run_units(&class, &units))
    }

    /// Run a single method, still wrapped in all of its class's hooks
    pub fn run_method(&mut self, class: &str, method: &str) -> Result<ClassResult, RunnerError> {
        let class = self.registry.find_class(class)?;
        let unit = self.registry.find_method(&class, method)?;
        Ok(self.run_units(&class, &[unit]))
    }

    fn run_units(&mut self, class: &TestClassDescriptor, units: &[&TestUnit]) -> ClassResult {
        info!("Running test class {} ({} methods)", class.name(), units.len());
        self.listener.class_started(class.name());

        let timer = Timer::start(class.name());
        let result = match failure::catch(|| Ok(class.instantiate())) {
            Ok(mut instance) => self.run_instance(class, units, instance.as_mut(), timer),
            Err(failure) => {
                warn!("Could not create {}: {}", class.name(), failure.message());
                let mut lines = failure.lines();
                if let Some(first) = lines.first_mut() {
                    *first = format!("InstantiationFailure: {first}");
                }
                ClassResult::not_instantiated(class.name(), timer.stop_ms(), lines)
            }
        };

        info!(
            "{} {} [{}ms] - {}/{} methods passed",
            result.outcome,
            result.name,
            result.elapsed_ms,
            result.passed_methods(),
            result.method_results.len()
        );
        self.listener.class_finished(&result);
        result
    }

    fn run_instance(
        &mut self,
        class: &TestClassDescriptor,
        units: &[&TestUnit],
        instance: &mut dyn Any,
        timer: Timer,
    ) -> ClassResult {
        let mut method_results = Vec::with_capacity(units.len());

        let hook_failure = self
            .run_lifecycle(class, units, instance, &mut method_results)
            .err();

        if let Some(hook) = &hook_failure {
            warn!(
                "{} hook of {} failed: {}",
                hook.kind,
                class.name(),
                hook.failure.message()
            );
        }

        ClassResult::new(
            class.name(),
            method_results,
            timer.stop_ms(),
            hook_failure.map(HookFailure::into_messages),
        )
    }

    fn run_lifecycle(
        &mut self,
        class: &TestClassDescriptor,
        units: &[&TestUnit],
        instance: &mut dyn Any,
        method_results: &mut Vec<MethodResult>,
    ) -> Result<(), HookFailure> {
        run_hook(class, HookKind::BeforeAll, instance)?;

        for unit in units {
            run_hook(class, HookKind::BeforeEach, instance)?;

            let result = run_test(unit, instance);
            let after_each = run_hook(class, HookKind::AfterEach, instance);

            self.listener.method_finished(&result);
            method_results.push(result);
            after_each?;
        }

        run_hook(class, HookKind::AfterAll, instance)
    }
}

fn run_hook(
    class: &TestClassDescriptor,
    kind: HookKind,
    instance: &mut dyn Any,
) -> Result<(), HookFailure> {
    let Some(hook) = class.hook(kind) else {
        return Ok(());
    };

    debug!("Running {} hook of {}", kind, class.name());
    failure::catch(|| hook(instance)).map_err(|failure| HookFailure { kind, failure })
}

fn run_test(unit: &TestUnit, instance: &mut dyn Any) -> MethodResult {
    let timer = Timer::start(unit.name());
    let outcome = failure::catch(|| (unit.invoke())(instance));
    let elapsed_ms = timer.stop_ms();

    match outcome {
        Ok(()) => {
            debug!("{}::{} passed in {}ms", unit.class_name(), unit.name(), elapsed_ms);
            MethodResult::success(unit.name(), elapsed_ms)
        }
        Err(failure) => {
            debug!(
                "{}::{} failed in {}ms: {}",
                unit.class_name(),
                unit.name(),
                elapsed_ms,
                failure.message()
            );
            MethodResult::fail(unit.name(), failure.lines(), elapsed_ms)
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::assertions::assert_equal;
    use crate::models::{Outcome, METHOD_FAILURE_MESSAGE};
    use crate::registry::{TestClass, TestResult};
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct Tracker {
        log: Log,
    }

    impl Tracker {
        fn record(&mut self, event: &str) -> TestResult {
            self.log.lock().unwrap().push(event.to_string());
            Ok(())
        }
    }

    fn tracked_class(name: &str, log: &Log) -> TestClass<Tracker> {
        let log = Arc::clone(log);
        TestClass::with_factory(name, move || Tracker {
            log: Arc::clone(&log),
        })
    }

    fn with_hooks(class: TestClass<Tracker>) -> TestClass<Tracker> {
        class
            .before_all(|p: &mut Tracker| p.record("before_all"))
            .before_each(|p: &mut Tracker| p.record("before_each"))
            .after_each(|p: &mut Tracker| p.record("after_each"))
            .after_all(|p: &mut Tracker| p.record("after_all"))
    }

    fn events(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl RunListener for Recorder {
        fn class_started(&mut self, class_name: &str) {
            self.events.push(format!("start {class_name}"));
        }

        fn method_finished(&mut self, result: &MethodResult) {
            self.events.push(format!("method {} {}", result.name, result.outcome));
        }

        fn class_finished(&mut self, result: &ClassResult) {
            self.events.push(format!("end {} {}", result.name, result.outcome));
        }
    }

    #[test]
    fn test_lifecycle_order() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry
            .register(
                with_hooks(tracked_class("Lifecycle", &log))
                    .test("A", |p: &mut Tracker| p.record("A"))
                    .test("B", |p: &mut Tracker| p.record("B")),
            )
            .unwrap();

        let result = TestRunner::new(&registry).run_class("Lifecycle").unwrap();

        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(
            events(&log),
            vec![
                "before_all",
                "before_each",
                "A",
                "after_each",
                "before_each",
                "B",
                "after_each",
                "after_all"
            ]
        );
    }

    #[test]
    fn test_method_failure_is_isolated() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry
            .register(
                with_hooks(tracked_class("Isolation", &log))
                    .test("A", |_: &mut Tracker| Err(anyhow!("A exploded")))
                    .test("B", |p: &mut Tracker| p.record("B")),
            )
            .unwrap();

        let result = TestRunner::new(&registry).run_class("Isolation").unwrap();

        assert_eq!(result.outcome, Outcome::Fail);
        assert_eq!(result.messages, vec![METHOD_FAILURE_MESSAGE.to_string()]);
        assert_eq!(result.failed_hook, None);
        assert_eq!(result.method_results.len(), 2);

        let a = result.method("A").unwrap();
        assert_eq!(a.outcome, Outcome::Fail);
        assert_eq!(a.messages[0], "Error: A exploded");
        assert_eq!(result.method("B").unwrap().outcome, Outcome::Success);
        assert!(result.method("B").unwrap().messages.is_empty());

        let events = events(&log);
        assert_eq!(events.last().map(String::as_str), Some("after_all"));
        assert!(events.contains(&"B".to_string()));
    }

    #[test]
    fn test_panicking_method_is_isolated() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry
            .register(
                tracked_class("Panics", &log)
                    .test("Boom", |_: &mut Tracker| panic!("kaboom"))
                    .test("Fine", |p: &mut Tracker| p.record("Fine")),
            )
            .unwrap();

        let result = TestRunner::new(&registry).run_class("Panics").unwrap();

        let boom = result.method("Boom").unwrap();
        assert_eq!(boom.outcome, Outcome::Fail);
        assert_eq!(boom.messages[0], "Panic: kaboom");
        assert_eq!(result.method("Fine").unwrap().outcome, Outcome::Success);
    }

    #[test]
    fn test_assertion_failure_kind() {
        let mut registry = Registry::new();
        registry
            .register(
                tracked_class("Asserts", &Log::default())
                    .test("Mismatch", |_: &mut Tracker| Ok(assert_equal(&0, &1)?)),
            )
            .unwrap();

        let result = TestRunner::new(&registry).run_class("Asserts").unwrap();
        assert_eq!(
            result.method("Mismatch").unwrap().messages[0],
            "AssertionFailure: Value is not equal, is: '1', but should be: '0'."
        );
    }

    #[test]
    fn test_before_all_failure_skips_everything() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry
            .register(
                tracked_class("BrokenSetup", &log)
                    .before_all(|_: &mut Tracker| Err(anyhow!("no database")))
                    .after_all(|p: &mut Tracker| p.record("after_all"))
                    .test("A", |p: &mut Tracker| p.record("A")),
            )
            .unwrap();

        let result = TestRunner::new(&registry).run_class("BrokenSetup").unwrap();

        assert_eq!(result.outcome, Outcome::Fail);
        assert!(result.method_results.is_empty());
        assert_eq!(result.failed_hook, Some(HookKind::BeforeAll));
        assert_eq!(
            result.messages[0],
            "LifecycleHookFailure(BeforeAll): Error: no database"
        );
        assert!(events(&log).is_empty());
    }

    #[test]
    fn test_before_each_failure_aborts_class() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry
            .register(
                tracked_class("BrokenEach", &log)
                    .before_each(|_: &mut Tracker| Err(anyhow!("fixture unavailable")))
                    .after_all(|p: &mut Tracker| p.record("after_all"))
                    .test("A", |p: &mut Tracker| p.record("A"))
                    .test("B", |p: &mut Tracker| p.record("B")),
            )
            .unwrap();

        let result = TestRunner::new(&registry).run_class("BrokenEach").unwrap();

        assert_eq!(result.outcome, Outcome::Fail);
        assert_eq!(result.failed_hook, Some(HookKind::BeforeEach));
        assert!(result.method_results.is_empty());
        assert!(events(&log).is_empty());
    }

    #[test]
    fn test_after_each_failure_keeps_reported_result() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry
            .register(
                tracked_class("BrokenTeardown", &log)
                    .after_each(|_: &mut Tracker| Err(anyhow!("cleanup failed")))
                    .test("A", |p: &mut Tracker| p.record("A"))
                    .test("B", |p: &mut Tracker| p.record("B")),
            )
            .unwrap();

        let mut recorder = Recorder::default();
        let result = TestRunner::new(&registry)
            .with_listener(&mut recorder)
            .run_class("BrokenTeardown")
            .unwrap();

        assert_eq!(result.outcome, Outcome::Fail);
        assert_eq!(result.failed_hook, Some(HookKind::AfterEach));
        assert_eq!(result.method_results.len(), 1);
        assert_eq!(events(&log), vec!["A"]);
        assert_eq!(
            recorder.events,
            vec![
                "start BrokenTeardown",
                "method A SUCCESS",
                "end BrokenTeardown FAIL"
            ]
        );
    }

    #[test]
    fn test_after_all_failure_fails_passing_class() {
        let mut registry = Registry::new();
        registry
            .register(
                tracked_class("BrokenAfterAll", &Log::default())
                    .after_all(|_: &mut Tracker| panic!("teardown panic"))
                    .test("A", |_: &mut Tracker| Ok(())),
            )
            .unwrap();

        let result = TestRunner::new(&registry)
            .run_class("BrokenAfterAll")
            .unwrap();

        assert_eq!(result.outcome, Outcome::Fail);
        assert_eq!(result.failed_hook, Some(HookKind::AfterAll));
        assert_eq!(result.method("A").unwrap().outcome, Outcome::Success);
        assert_eq!(
            result.messages[0],
            "LifecycleHookFailure(AfterAll): Panic: teardown panic"
        );
    }

    #[test]
    fn test_run_method_narrows_to_one() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry
            .register(
                with_hooks(tracked_class("Narrow", &log))
                    .test("A", |p: &mut Tracker| p.record("A"))
                    .test("B", |p: &mut Tracker| p.record("B")),
            )
            .unwrap();

        let result = TestRunner::new(&registry).run_method("Narrow", "B").unwrap();

        assert_eq!(result.method_results.len(), 1);
        assert_eq!(result.method_results[0].name, "B");
        assert_eq!(
            events(&log),
            vec!["before_all", "before_each", "B", "after_each", "after_all"]
        );
    }

    #[test]
    fn test_unknown_selection_errors() {
        let mut registry = Registry::new();
        registry
            .register(tracked_class("Known", &Log::default()).test("A", |_: &mut Tracker| Ok(())))
            .unwrap();
        let mut runner = TestRunner::new(&registry);

        assert_eq!(
            runner.run_class("NoSuchClass").unwrap_err(),
            RunnerError::UnknownClass("NoSuchClass".into())
        );
        assert_eq!(
            runner.run_method("Known", "NoSuchMethod").unwrap_err(),
            RunnerError::UnknownMethod {
                class: "Known".into(),
                method: "NoSuchMethod".into(),
            }
        );
        assert!(runner
            .run(&Selection::Class("NoSuchClass".into()))
            .is_err());
    }

    #[test]
    fn test_fresh_instance_per_run() {
        #[derive(Default)]
        struct Counter {
            runs: u32,
        }

        let mut registry = Registry::new();
        registry
            .register(TestClass::<Counter>::new("Fresh").test("Once", |c: &mut Counter| {
                c.runs += 1;
                assert_equal(&1, &c.runs)?;
                Ok(())
            }))
            .unwrap();

        let mut runner = TestRunner::new(&registry);
        let first = runner.run_class("Fresh").unwrap();
        let second = runner.run_class("Fresh").unwrap();
        assert_eq!(first.outcome, Outcome::Success);
        assert_eq!(second.outcome, Outcome::Success);
    }

    #[test]
    fn test_repeated_runs_are_structurally_equal() {
        let mut registry = Registry::new();
        registry
            .register(
                tracked_class("Stable", &Log::default())
                    .test("Pass", |_: &mut Tracker| Ok(()))
                    .test("Fail", |_: &mut Tracker| Err(anyhow!("always"))),
            )
            .unwrap();

        let mut runner = TestRunner::new(&registry);
        let strip = |mut result: ClassResult| {
            result.elapsed_ms = 0;
            for method in &mut result.method_results {
                method.elapsed_ms = 0;
            }
            result
        };

        let first = strip(runner.run_class("Stable").unwrap());
        let second = strip(runner.run_class("Stable").unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_all_streams_every_class() {
        let mut registry = Registry::new();
        registry
            .register(tracked_class("One", &Log::default()).test("A", |_: &mut Tracker| Ok(())))
            .unwrap();
        registry
            .register(
                tracked_class("Two", &Log::default())
                    .test("B", |_: &mut Tracker| Err(anyhow!("nope"))),
            )
            .unwrap();

        let mut recorder = Recorder::default();
        let results = TestRunner::new(&registry)
            .with_listener(&mut recorder)
            .run(&Selection::All)
            .unwrap();

        assert_eq!(results.len(), 2);
        let summary = RunSummary::new(&results);
        assert_eq!(summary.classes_passed, 1);
        assert_eq!(summary.methods_total, 2);

        assert_eq!(recorder.events.len(), 6);
        assert!(recorder.events.contains(&"method B FAIL".to_string()));
        assert!(recorder.events.contains(&"end One SUCCESS".to_string()));
    }

    #[test]
    fn test_outcome_matches_method_failures() {
        let mut registry = Registry::new();
        registry
            .register(
                tracked_class("AllPass", &Log::default())
                    .test("A", |_: &mut Tracker| Ok(()))
                    .test("B", |_: &mut Tracker| Ok(())),
            )
            .unwrap();
        registry
            .register(
                tracked_class("OneFails", &Log::default())
                    .test("A", |_: &mut Tracker| Ok(()))
                    .test("B", |_: &mut Tracker| Err(anyhow!("x"))),
            )
            .unwrap();

        for result in TestRunner::new(&registry).run_all() {
            let any_failed = result
                .method_results
                .iter()
                .any(|method| method.outcome == Outcome::Fail);
            let hook_failed = result.failed_hook.is_some();
            assert_eq!(result.outcome == Outcome::Fail, any_failed || hook_failed);
        }
    }

    #[test]
    fn test_repeated_runs_with_backtraces_enabled() {
        let _lock = crate::utils::ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let previous = std::env::var("RUST_LIB_BACKTRACE").ok();
        std::env::set_var("RUST_LIB_BACKTRACE", "1");

        let mut registry = Registry::new();
        registry
            .register(tracked_class("Traced", &Log::default()).test("Fail", |_: &mut Tracker| {
                assert_equal(&0, &1)?;
                Ok(())
            }))
            .unwrap();

        let mut runner = TestRunner::new(&registry);
        let first = runner.run_class("Traced").unwrap();
        let second = runner.run_class("Traced").unwrap();

        match previous {
            Some(value) => std::env::set_var("RUST_LIB_BACKTRACE", value),
            None => std::env::remove_var("RUST_LIB_BACKTRACE"),
        }

        assert_eq!(
            first.method_results[0].messages,
            second.method_results[0].messages
        );
        assert!(!first.method_results[0]
            .messages
            .iter()
            .any(|line| line.contains("run_class")));
    }

    #[test]
    fn test_factory_panic_fails_only_that_class() {
        let mut registry = Registry::new();
        registry
            .register(
                TestClass::with_factory("Fragile", || -> Tracker { panic!("ctor failed") })
                    .test("Never", |_: &mut Tracker| Ok(())),
            )
            .unwrap();
        registry
            .register(tracked_class("Sturdy", &Log::default()).test("A", |_: &mut Tracker| Ok(())))
            .unwrap();

        let mut recorder = Recorder::default();
        let results = TestRunner::new(&registry)
            .with_listener(&mut recorder)
            .run_all();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].outcome, Outcome::Fail);
        assert!(results[0].method_results.is_empty());
        assert_eq!(results[0].failed_hook, None);
        assert_eq!(
            results[0].messages[0],
            "InstantiationFailure: Panic: ctor failed"
        );
        assert_eq!(results[1].outcome, Outcome::Success);
        assert_eq!(
            recorder.events,
            vec![
                "start Fragile",
                "end Fragile FAIL",
                "start Sturdy",
                "method A SUCCESS",
                "end Sturdy SUCCESS",
            ]
        );
    }
}
