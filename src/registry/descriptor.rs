//! Test container descriptors
//!
//! A [`TestClass`] is the registration-time builder for a container type;
//! [`TestClassDescriptor`] is its validated, type-erased form held by the
//! registry.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RunnerError;

/// Return type of test bodies and lifecycle hooks
pub type TestResult = anyhow::Result<()>;

/// Type-erased callable for a single unit or hook
pub type UnitFn = Arc<dyn Fn(&mut dyn Any) -> TestResult + Send + Sync>;

type Factory = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// Lifecycle hook kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookKind {
    BeforeAll,
    AfterAll,
    BeforeEach,
    AfterEach,
}

impl HookKind {
    pub fn all() -> [HookKind; 4] {
        [
            HookKind::BeforeAll,
            HookKind::BeforeEach,
            HookKind::AfterEach,
            HookKind::AfterAll,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            HookKind::BeforeAll => "BeforeAll",
            HookKind::AfterAll => "AfterAll",
            HookKind::BeforeEach => "BeforeEach",
            HookKind::AfterEach => "AfterEach",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of a registered callable within its container
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitKind {
    TestMethod,
    Hook(HookKind),
}

/// A single test method of a test container
#[derive(Clone)]
pub struct TestUnit {
    class_name: String,
    name: String,
    invoke: UnitFn,
}

impl TestUnit {
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn invoke(&self) -> &UnitFn {
        &self.invoke
    }
}

impl fmt::Debug for TestUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestUnit")
            .field("class_name", &self.class_name)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registered test container: factory, hooks and test units
pub struct TestClassDescriptor {
    name: String,
    factory: Factory,
    hooks: HashMap<HookKind, UnitFn>,
    tests: Vec<TestUnit>,
}

impl TestClassDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Test units in declaration order
    pub fn tests(&self) -> &[TestUnit] {
        &self.tests
    }

    pub fn has_hook(&self, kind: HookKind) -> bool {
        self.hooks.contains_key(&kind)
    }

    pub(crate) fn hook(&self, kind: HookKind) -> Option<&UnitFn> {
        self.hooks.get(&kind)
    }

    /// Create a fresh container instance
    pub(crate) fn instantiate(&self) -> Box<dyn Any> {
        (self.factory)()
    }

    /// Look up a test unit by method name
    pub fn find_method(&self, name: &str) -> Result<&TestUnit, RunnerError> {
        self.tests
            .iter()
            .find(|unit| unit.name == name)
            .ok_or_else(|| RunnerError::UnknownMethod {
                class: self.name.clone(),
                method: name.to_string(),
            })
    }
}

impl fmt::Debug for TestClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hooks: Vec<_> = self.hooks.keys().map(HookKind::name).collect();
        hooks.sort_unstable();
        f.debug_struct("TestClassDescriptor")
            .field("name", &self.name)
            .field("hooks", &hooks)
            .field("tests", &self.tests)
            .finish()
    }
}

/// Registration builder for a test container of type `T`
///
/// ```ignore
/// TestClass::<Counter>::new("Counter")
///     .before_each(|c| { c.value = 0; Ok(()) })
///     .test("Increments", |c| { c.value += 1; assert_equal(&1, &c.value)?; Ok(()) })
/// ```
pub struct TestClass<T> {
    name: String,
    factory: Arc<dyn Fn() -> T + Send + Sync>,
    units: Vec<(UnitKind, String, UnitFn)>,
}

impl<T: Default + 'static> TestClass<T> {
    /// Container instances are created with `T::default()`
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_factory(name, T::default)
    }
}

impl<T: 'static> TestClass<T> {
    pub fn with_factory(
        name: impl Into<String>,
        factory: impl Fn() -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
            units: Vec::new(),
        }
    }

    /// Add a test method
    pub fn test<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut T) -> TestResult + Send + Sync + 'static,
    {
        self.unit(UnitKind::TestMethod, name.into(), body)
    }

    pub fn before_all<F>(self, hook: F) -> Self
    where
        F: Fn(&mut T) -> TestResult + Send + Sync + 'static,
    {
        self.hook(HookKind::BeforeAll, hook)
    }

    pub fn after_all<F>(self, hook: F) -> Self
    where
        F: Fn(&mut T) -> TestResult + Send + Sync + 'static,
    {
        self.hook(HookKind::AfterAll, hook)
    }

    pub fn before_each<F>(self, hook: F) -> Self
    where
        F: Fn(&mut T) -> TestResult + Send + Sync + 'static,
    {
        self.hook(HookKind::BeforeEach, hook)
    }

    pub fn after_each<F>(self, hook: F) -> Self
    where
        F: Fn(&mut T) -> TestResult + Send + Sync + 'static,
    {
        self.hook(HookKind::AfterEach, hook)
    }

    fn hook<F>(self, kind: HookKind, hook: F) -> Self
    where
        F: Fn(&mut T) -> TestResult + Send + Sync + 'static,
    {
        self.unit(UnitKind::Hook(kind), kind.name().to_string(), hook)
    }

    fn unit<F>(mut self, kind: UnitKind, name: String, body: F) -> Self
    where
        F: Fn(&mut T) -> TestResult + Send + Sync + 'static,
    {
        let invoke: UnitFn = Arc::new(move |instance: &mut dyn Any| {
            match instance.downcast_mut::<T>() {
                Some(instance) => body(instance),
                None => Err(anyhow!(
                    "container instance is not a {}",
                    type_name::<T>()
                )),
            }
        });
        self.units.push((kind, name, invoke));
        self
    }

    /// Validate the declared units and erase the container type
    pub fn build(self) -> Result<TestClassDescriptor, RunnerError> {
        let mut hooks = HashMap::new();
        let mut tests: Vec<TestUnit> = Vec::new();

        for (kind, name, invoke) in self.units {
            match kind {
                UnitKind::Hook(hook) => {
                    if hooks.insert(hook, invoke).is_some() {
                        return Err(RunnerError::DuplicateHook {
                            class: self.name,
                            kind: hook,
                        });
                    }
                }
                UnitKind::TestMethod => {
                    if tests.iter().any(|unit| unit.name == name) {
                        return Err(RunnerError::DuplicateMethod {
                            class: self.name,
                            method: name,
                        });
                    }
                    tests.push(TestUnit {
                        class_name: self.name.clone(),
                        name,
                        invoke,
                    });
                }
            }
        }

        let factory = self.factory;
        Ok(TestClassDescriptor {
            name: self.name,
            factory: Arc::new(move || Box::new(factory()) as Box<dyn Any>),
            hooks,
            tests,
        })
    }
}
