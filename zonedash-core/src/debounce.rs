//! Trailing-edge debouncer.
//!
//! Holds at most one pending timer. Each [`Debouncer::schedule`] call cancels the
//! previous timer and starts a new one, so a burst of calls collapses into a
//! single run of the last future once the quiet period has elapsed.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Owned debounce timer.
///
/// Dropping the debouncer cancels a pending timer. Work that already started
/// when its timer fired is detached and runs to completion.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timer: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `task` after the quiet period, unless another call comes first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later cancel never aborts a request in flight
            tokio::spawn(task);
        });

        if let Some(previous) = self.timer().replace(handle) {
            previous.abort();
        }
    }

    /// Cancel the pending timer. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.timer().take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    /// Whether a timer is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.timer().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}
