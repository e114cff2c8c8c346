//! Process-wide cancellation signal with interruptible waits.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Cloneable cancellation flag.
///
/// Every blocking wait in the controller goes through
/// [`ShutdownSignal::wait_timeout`], so triggering wakes all of them at once.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    triggered: Mutex<bool>,
    wake: Condvar,
}

impl ShutdownSignal {
    /// Create an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake every waiter.
    pub fn trigger(&self) {
        let mut triggered = self.inner.triggered.lock();
        *triggered = true;
        self.inner.wake.notify_all();
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.inner.triggered.lock()
    }

    /// Block for up to `timeout`. Returns `true` if cancellation was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut triggered = self.inner.triggered.lock();
        if *triggered || timeout.is_zero() {
            return *triggered;
        }

        let deadline = Instant::now() + timeout;
        while !*triggered {
            if self.inner.wake.wait_until(&mut triggered, deadline).timed_out() {
                break;
            }
        }
        *triggered
    }
}
