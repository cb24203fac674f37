//! Single-flight execution of asynchronous SDK calls.
//!
//! The SDK returns from every request at once and reports the result later
//! from its own threads. [`SingleFlightExecutor::run`] turns one such call
//! into a blocking step: close the gate, issue the call, park until the
//! bridge opens the gate again.
//!
//! The calling thread must not be the one delivering SDK callbacks, or the
//! wait can never end.

mod gate;

use std::sync::Arc;
use std::time::Duration;

use mirror_core::DownloadError;

pub use gate::CompletionGate;

/// Runs one asynchronous SDK operation at a time and blocks until it ends.
///
/// Reusable across the sequential steps of an attempt (login, resolve,
/// transfer), each a separate clear/wait cycle on the same gate.
#[derive(Debug, Clone)]
pub struct SingleFlightExecutor {
    gate: Arc<CompletionGate>,
    timeout: Option<Duration>,
}

impl SingleFlightExecutor {
    /// Create an executor. `None` waits without bound.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            gate: Arc::new(CompletionGate::new()),
            timeout,
        }
    }

    /// The gate the event bridge must signal.
    pub fn gate(&self) -> Arc<CompletionGate> {
        Arc::clone(&self.gate)
    }

    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Issue `operation` and block until its terminal event.
    pub fn run<F>(&self, operation: F) -> Result<(), DownloadError>
    where
        F: FnOnce(),
    {
        self.gate.clear();
        operation();
        self.wait()
    }

    /// Block until the gate opens, without closing it first.
    ///
    /// Used to drain the terminal event of an operation that was aborted
    /// after a timed-out `run`.
    pub fn wait(&self) -> Result<(), DownloadError> {
        match self.timeout {
            None => {
                self.gate.wait();
                Ok(())
            }
            Some(timeout) => {
                if self.gate.wait_timeout(timeout) {
                    Ok(())
                } else {
                    Err(DownloadError::timeout(timeout.as_secs()))
                }
            }
        }
    }
}
