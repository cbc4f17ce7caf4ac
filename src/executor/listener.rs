//! Result listeners
//!
//! The runner streams progress to a [`RunListener`] as it goes. Every
//! callback has a no-op default, so a listener implements only what it needs.

use crate::models::{ClassResult, MethodResult};

pub trait RunListener {
    /// A class run has begun
    fn class_started(&mut self, _class_name: &str) {}

    /// Called right after each method completes, before the next one starts
    fn method_finished(&mut self, _result: &MethodResult) {}

    /// A class run has completed
    fn class_finished(&mut self, _result: &ClassResult) {}
}

/// Listener that ignores every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl RunListener for NoopListener {}

impl<L: RunListener + ?Sized> RunListener for &mut L {
    fn class_started(&mut self, class_name: &str) {
        (**self).class_started(class_name);
    }

    fn method_finished(&mut self, result: &MethodResult) {
        (**self).method_finished(result);
    }

    fn class_finished(&mut self, result: &ClassResult) {
        (**self).class_finished(result);
    }
}

impl<L: RunListener + ?Sized> RunListener for Box<L> {
    fn class_started(&mut self, class_name: &str) {
        (**self).class_started(class_name);
    }

    fn method_finished(&mut self, result: &MethodResult) {
        (**self).method_finished(result);
    }

    fn class_finished(&mut self, result: &ClassResult) {
        (**self).class_finished(result);
    }
}
