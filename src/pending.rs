//! The pending-call table: tracks outstanding outbound calls and settles
//! each exactly once when its matching [`crate::invoke::IReturn`] arrives.
use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::error::RpcError;
use crate::invoke::CallId;

/// What an issued call eventually resolves to: the remote return value, or
/// either kind of `RpcError` — a remote throw (`RpcError::Remote`) settled by
/// [`crate::communicator::Communicator::reply_data`], or a local teardown
/// (`RpcError::Local`) settled by [`crate::communicator::Communicator::destructor`].
pub type CallOutcome = Result<crate::value::Value, RpcError>;

/// A table of `uid -> oneshot sender`, one entry per in-flight outbound call.
///
/// `oneshot::Sender` already enforces exactly-once settlement at the type
/// level, so this table's only job is routing: map an incoming `uid` to the
/// right waiter, and sweep everything on teardown.
pub struct PendingCalls {
    inner: Mutex<HashMap<CallId, oneshot::Sender<CallOutcome>>>,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("pending calls mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a new outstanding call, returning the receiver half the
    /// caller awaits on.
    pub fn register(&self, uid: CallId) -> oneshot::Receiver<CallOutcome> {
        let (tx, rx) = oneshot::channel();
        self.inner
            .lock()
            .expect("pending calls mutex poisoned")
            .insert(uid, tx);
        rx
    }

    /// Removes and returns the waiter for `uid`, if any is still outstanding.
    /// Returns `None` for an unknown or already-settled uid — a late or
    /// duplicate `IReturn` is silently dropped rather than treated as an error.
    pub fn take(&self, uid: CallId) -> Option<oneshot::Sender<CallOutcome>> {
        self.inner
            .lock()
            .expect("pending calls mutex poisoned")
            .remove(&uid)
    }

    /// Drains every outstanding waiter, settling each with `outcome`. Used on
    /// teardown so no caller awaits forever on a channel that will never see
    /// its reply.
    pub fn drain_with(&self, outcome: impl Fn() -> CallOutcome) {
        let drained: Vec<_> = self
            .inner
            .lock()
            .expect("pending calls mutex poisoned")
            .drain()
            .collect();
        for (_, tx) in drained {
            let _ = tx.send(outcome());
        }
    }
}

impl Default for PendingCalls {
    fn default() -> Self {
        Self::new()
    }
}
