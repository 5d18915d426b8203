//! Graceful-shutdown coordination: lets callers wait until every in-flight
//! call this communicator is servicing has settled.
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{timeout, timeout_at, Instant};

/// A one-shot-per-communicator latch: many waiters, one closer.
///
/// Built on [`Notify`] rather than a [`tokio::sync::watch`] or a condvar
/// because we only ever need "closed or not" — `Notify`'s documented
/// idiom (create the `Notified` future, re-check the flag, then await) avoids
/// the classic missed-wakeup race where `notify_all` fires between the flag
/// check and the await.
pub struct JoinCoordinator {
    closed: AtomicBool,
    notify: Notify,
}

impl JoinCoordinator {
    pub fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Marks the coordinator closed and wakes every current and future
    /// waiter. Idempotent: calling this more than once is a no-op after the
    /// first call.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// Waits until [`close`](Self::close) has been called, with no deadline.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_closed() {
                return;
            }
            notified.await;
            if self.is_closed() {
                return;
            }
        }
    }

    /// Waits until closed or `duration` elapses, whichever comes first.
    /// Returns `true` if closed, `false` on timeout.
    pub async fn wait_for(&self, duration: Duration) -> bool {
        if self.is_closed() {
            return true;
        }
        matches!(timeout(duration, self.wait()).await, Ok(()))
    }

    /// As [`Self::wait_for`], but with an absolute deadline instead of a
    /// relative duration.
    pub async fn wait_until(&self, deadline: Instant) -> bool {
        if self.is_closed() {
            return true;
        }
        matches!(timeout_at(deadline, self.wait()).await, Ok(()))
    }
}

impl Default for JoinCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
