//! Failure capture
//!
//! Converts errors returned by test code, and panics raised by it, into the
//! diagnostic lines stored in result records.

use std::any::Any;
use std::backtrace::BacktraceStatus;
use std::cell::{Cell, RefCell};
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::assertions::AssertionError;
use crate::error::RunnerError;

thread_local! {
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
    static CAPTURE_DEPTH: Cell<u32> = const { Cell::new(0) };
}

static PANIC_HOOK: Once = Once::new();

/// Frame name marking the isolation boundary in captured backtraces
const CATCH_FRAME: &str = "executor::failure::catch";

/// Record the location of every panic for the panicking thread.
///
/// Panics raised inside [`capture_panics`] are only recorded; all others are
/// passed on to the previously installed hook.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("at {}:{}:{}", loc.file(), loc.line(), loc.column()));
            PANIC_LOCATION.with(|slot| *slot.borrow_mut() = location);
            if !is_capturing() {
                previous(info);
            }
        }));
    });
}

fn is_capturing() -> bool {
    CAPTURE_DEPTH.with(|depth| depth.get() > 0)
}

struct CaptureGuard;

impl CaptureGuard {
    fn enter() -> Self {
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get() + 1));
        CaptureGuard
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Run `action`, converting a panic into a [`Failure`] without printing it
pub(crate) fn capture_panics<R>(action: impl FnOnce() -> R) -> Result<R, Failure> {
    install_panic_hook();
    let _guard = CaptureGuard::enter();
    panic::catch_unwind(AssertUnwindSafe(action)).map_err(Failure::from_panic)
}

/// Backtrace lines up to, not including, the frame of [`catch`]
///
/// Frames past the boundary belong to the caller and differ between call
/// sites. Without the boundary frame (e.g. inlined) nothing is kept.
fn trim_trace(backtrace: &str) -> Vec<String> {
    let lines: Vec<&str> = backtrace.lines().collect();
    match lines.iter().position(|line| line.contains(CATCH_FRAME)) {
        Some(boundary) => lines[..boundary].iter().map(|line| line.to_string()).collect(),
        None => Vec::new(),
    }
}

/// A captured test failure
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    kind: &'static str,
    message: String,
    context: Vec<String>,
    trace: Vec<String>,
}

impl Failure {
    /// Capture the innermost cause of an error
    pub fn from_error(err: &anyhow::Error) -> Self {
        let chain: Vec<&(dyn StdError + 'static)> = err.chain().collect();
        let (root, wrappers) = match chain.split_last() {
            Some((root, wrappers)) => (*root, wrappers),
            None => (err.root_cause(), &[][..]),
        };

        let backtrace = err.backtrace();
        let trace = if backtrace.status() == BacktraceStatus::Captured {
            trim_trace(&backtrace.to_string())
        } else {
            Vec::new()
        };

        Self {
            kind: kind_of(root),
            message: root.to_string(),
            context: wrappers.iter().map(|cause| cause.to_string()).collect(),
            trace,
        }
    }

    /// Capture a panic payload raised on the current thread
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "Box<dyn Any>".to_string()
        };

        let location = PANIC_LOCATION.with(|slot| slot.borrow_mut().take());

        Self {
            kind: "Panic",
            message,
            context: Vec::new(),
            trace: location.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> &str {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Context and trace lines following the message
    pub fn detail_lines(&self) -> Vec<String> {
        self.context
            .iter()
            .map(|context| format!("Context: {context}"))
            .chain(self.trace.iter().cloned())
            .collect()
    }

    /// Diagnostic lines; the first is `<Kind>: <message>`
    pub fn lines(&self) -> Vec<String> {
        let mut message_lines = self.message.lines();
        let mut lines = vec![format!(
            "{}: {}",
            self.kind,
            message_lines.next().unwrap_or_default()
        )];
        lines.extend(message_lines.map(str::to_string));
        lines.extend(self.detail_lines());
        lines
    }
}

fn kind_of(root: &(dyn StdError + 'static)) -> &'static str {
    if let Some(err) = root.downcast_ref::<AssertionError>() {
        err.kind()
    } else if root.is::<RunnerError>() {
        "RunnerError"
    } else if root.is::<std::io::Error>() {
        "IoError"
    } else {
        "Error"
    }
}

/// Run test code, converting both returned errors and panics into a failure
pub fn catch<T, F>(action: F) -> Result<T, Failure>
where
    F: FnOnce() -> anyhow::Result<T>,
{
    capture_panics(action)?.map_err(|err| Failure::from_error(&err))
}
