//! Cancelable one-shot timers on the tokio runtime.

use std::sync::Mutex;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::TimerError;

/// A one-shot timer. Cancelled on [`cancel`](Timer::cancel) or drop.
#[derive(Debug)]
pub struct Timer {
    handle: Option<JoinHandle<()>>,
}

impl Timer {
    /// Run `f` after `delay` on the current tokio runtime.
    pub fn start<F>(delay: Duration, f: F) -> Result<Self, TimerError>
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
        Ok(Self::start_on(&runtime, delay, f))
    }

    /// Run `f` after `delay` on the given runtime.
    pub fn start_on<F>(runtime: &Handle, delay: Duration, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Stop the timer if it has not fired yet.
    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Whether the timer fired or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Let the timer run to completion without holding on to it.
    ///
    /// Used from inside the timer's own callback, where dropping would abort
    /// the running task.
    pub fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Delays a callback until calls stop arriving for `delay`.
///
/// At most one timer is in flight; each call replaces it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    slot: Mutex<Option<Timer>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slot: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `f`, cancelling whatever was pending.
    ///
    /// Without a runtime `f` runs immediately.
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let Ok(mut slot) = self.slot.lock() else {
            return;
        };
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
        match Handle::try_current() {
            Ok(runtime) if !self.delay.is_zero() => {
                *slot = Some(Timer::start_on(&runtime, self.delay, f));
            }
            _ => {
                drop(slot);
                f();
            }
        }
    }

    /// Whether a call is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.slot
            .lock()
            .map(|slot| slot.as_ref().is_some_and(|t| !t.is_finished()))
            .unwrap_or(false)
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        if let Ok(mut slot) = self.slot.lock()
            && let Some(timer) = slot.take()
        {
            timer.cancel();
        }
    }
}
