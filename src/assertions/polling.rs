//! Polling assertions
//!
//! [`await_at_most`] treats an eventually-consistent action as passing if it
//! succeeds at least once before a deadline. The retry loop runs on a
//! blocking worker while a tokio timer tracks the deadline; whichever
//! finishes first decides the outcome, so a hanging action never delays the
//! timeout.
//!
//! When the deadline wins, the worker is abandoned rather than killed: it
//! keeps retrying in the background and its eventual result is discarded.
//! An action that never returns therefore leaks its worker thread. Use
//! [`Poller::cancel_on_timeout`] to stop the loop after its current attempt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::AssertionError;
use crate::executor::failure::{catch, Failure};

/// Delay between two attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

const NO_FAILURE_REASON: &str = "No exception, timed out.";

/// Retry `action` until it passes or `timeout` elapses
///
/// Must not be called from within a tokio runtime; use
/// [`await_at_most_async`] there.
pub fn await_at_most<F>(timeout: Duration, action: F) -> Result<(), AssertionError>
where
    F: FnMut() -> anyhow::Result<()> + Send + 'static,
{
    Poller::new(timeout).run(action)
}

/// Async form of [`await_at_most`] for callers inside a tokio runtime
pub async fn await_at_most_async<F>(timeout: Duration, action: F) -> Result<(), AssertionError>
where
    F: FnMut() -> anyhow::Result<()> + Send + 'static,
{
    Poller::new(timeout).run_async(action).await
}

/// Configurable polling assertion
#[derive(Clone, Debug)]
pub struct Poller {
    timeout: Duration,
    interval: Duration,
    cancel_on_timeout: bool,
}

impl Poller {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: DEFAULT_POLL_INTERVAL,
            cancel_on_timeout: false,
        }
    }

    /// Set the delay between attempts
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Stop the abandoned retry loop once the deadline fires
    pub fn cancel_on_timeout(mut self, cancel: bool) -> Self {
        self.cancel_on_timeout = cancel;
        self
    }

    /// Run the race on a private current-thread runtime
    pub fn run<F>(&self, action: F) -> Result<(), AssertionError>
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| AssertionError::TaskFaulted(format!("failed to start runtime: {e}")))?;

        let outcome = runtime.block_on(self.run_async(action));

        // Dropping the runtime would wait for an abandoned worker.
        runtime.shutdown_background();
        outcome
    }

    /// Race the retry loop against the deadline on the current runtime
    pub async fn run_async<F>(&self, action: F) -> Result<(), AssertionError>
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        let last_failure: Arc<Mutex<Option<Failure>>> = Arc::new(Mutex::new(None));
        let cancelled = Arc::new(AtomicBool::new(false));
        let started = Instant::now();

        let worker = tokio::task::spawn_blocking({
            let last_failure = Arc::clone(&last_failure);
            let cancelled = Arc::clone(&cancelled);
            let interval = self.interval;
            move || retry_until_pass(action, interval, &last_failure, &cancelled)
        });

        tokio::select! {
            biased;

            joined = worker => match joined {
                Ok(true) => {
                    debug!("Polling assertion passed after {}ms", started.elapsed().as_millis());
                    Ok(())
                }
                Ok(false) => Err(self.timed_out(&last_failure)),
                Err(e) => {
                    let reason = if e.is_panic() {
                        Failure::from_panic(e.into_panic()).message().to_string()
                    } else {
                        e.to_string()
                    };
                    Err(AssertionError::TaskFaulted(reason))
                }
            },
            _ = tokio::time::sleep(self.timeout) => {
                if self.cancel_on_timeout {
                    cancelled.store(true, Ordering::Release);
                } else {
                    debug!("Abandoning polling worker after {}ms", self.timeout.as_millis());
                }
                Err(self.timed_out(&last_failure))
            }
        }
    }

    fn timed_out(&self, last_failure: &Mutex<Option<Failure>>) -> AssertionError {
        let last = last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let (reason, trace) = match last {
            Some(failure) => (failure.message().to_string(), failure.detail_lines()),
            None => (NO_FAILURE_REASON.to_string(), Vec::new()),
        };

        warn!(
            "Polling assertion timed out after {}ms: {}",
            self.timeout.as_millis(),
            reason
        );

        AssertionError::Timeout {
            timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            reason,
            trace,
        }
    }
}

/// Returns `true` once an attempt passes, `false` when cancelled
fn retry_until_pass<F>(
    mut action: F,
    interval: Duration,
    last_failure: &Mutex<Option<Failure>>,
    cancelled: &AtomicBool,
) -> bool
where
    F: FnMut() -> anyhow::Result<()>,
{
    loop {
        match catch(&mut action) {
            Ok(()) => return true,
            Err(failure) => {
                *last_failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(failure);
            }
        }

        if cancelled.load(Ordering::Acquire) {
            return false;
        }
        thread::sleep(interval);
    }
}
