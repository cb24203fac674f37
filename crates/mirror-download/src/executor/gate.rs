//! Completion gate.
//!
//! A binary, resettable latch. The waiting side parks on a condition
//! variable until some other thread signals.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Binary, resettable synchronization gate.
///
/// Between `clear()` and the matching `wait()`, exactly one `signal()` must
/// eventually happen or the waiter blocks until its bound (if any) elapses.
/// Extra signals are harmless: the gate is already open.
#[derive(Debug, Default)]
pub struct CompletionGate {
    open: Mutex<bool>,
    cond: Condvar,
}

impl CompletionGate {
    /// Create a closed gate.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Close the gate.
    pub fn clear(&self) {
        *self.lock() = false;
    }

    /// Open the gate and wake every waiter.
    ///
    /// Returns `true` if this call opened it, `false` if it was already open.
    pub fn signal(&self) -> bool {
        let mut open = self.lock();
        let opened = !*open;
        *open = true;
        drop(open);
        self.cond.notify_all();
        opened
    }

    pub fn is_signalled(&self) -> bool {
        *self.lock()
    }

    /// Block until the gate is open.
    pub fn wait(&self) {
        let guard = self.lock();
        let _open = self
            .cond
            .wait_while(guard, |open| !*open)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Block until the gate is open or `timeout` elapses.
    ///
    /// Returns `true` if the gate opened.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (open, _result) = self
            .cond
            .wait_timeout_while(guard, timeout, |open| !*open)
            .unwrap_or_else(PoisonError::into_inner);
        *open
    }
}
