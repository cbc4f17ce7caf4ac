//! Test unit registry
//!
//! Test containers are discovered through explicit registration: each
//! container describes its hooks and test methods with a [`TestClass`]
//! builder and is added to a [`Registry`] at startup. Discovery is then a
//! lookup over the registered descriptors.

mod descriptor;

pub use descriptor::{
    HookKind, TestClass, TestClassDescriptor, TestResult, TestUnit, UnitFn, UnitKind,
};

use std::sync::Arc;
use tracing::debug;

use crate::error::RunnerError;

/// Registered test containers, in registration order
#[derive(Debug, Default)]
pub struct Registry {
    classes: Vec<Arc<TestClassDescriptor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a test container
    pub fn register<T: 'static>(&mut self, class: TestClass<T>) -> Result<(), RunnerError> {
        let descriptor = class.build()?;
        self.register_descriptor(descriptor)
    }

    /// Register an already built descriptor
    pub fn register_descriptor(
        &mut self,
        descriptor: TestClassDescriptor,
    ) -> Result<(), RunnerError> {
        if self.contains(descriptor.name()) {
            return Err(RunnerError::DuplicateClass(descriptor.name().to_string()));
        }

        debug!(
            "Registered test class {} ({} tests)",
            descriptor.name(),
            descriptor.tests().len()
        );
        self.classes.push(Arc::new(descriptor));
        Ok(())
    }

    /// All registered test containers
    pub fn discover_all(&self) -> Vec<Arc<TestClassDescriptor>> {
        self.classes.clone()
    }

    pub fn find_class(&self, name: &str) -> Result<Arc<TestClassDescriptor>, RunnerError> {
        self.classes
            .iter()
            .find(|class| class.name() == name)
            .cloned()
            .ok_or_else(|| RunnerError::UnknownClass(name.to_string()))
    }

    pub fn find_method<'d>(
        &self,
        descriptor: &'d TestClassDescriptor,
        name: &str,
    ) -> Result<&'d TestUnit, RunnerError> {
        descriptor.find_method(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.iter().any(|class| class.name() == name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
