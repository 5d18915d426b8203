//! The symmetric core of an RFC peer: multiplexes outbound calls, dispatches
//! inbound ones against a locally installed provider, and coordinates
//! shutdown so no caller is left awaiting a reply that will never arrive.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::dispatch;
use crate::driver::{CallIssuer, Driver};
use crate::error::{serialize_failure, CommunicatorError, RpcError, RpcFailure};
use crate::invoke::{IFunction, IParameter, IReturn, Invoke};
use crate::join::JoinCoordinator;
use crate::limits::{PendingCallGate, PendingCallLimit};
use crate::pending::PendingCalls;
use crate::provider::{Provider, ProviderNode};
use crate::transport::{SendData, Transport};
use crate::value::Value;

/// One side of an RFC connection, generic over its transport.
///
/// `T` is almost always a [`crate::connector::Connector`] wrapping something
/// that implements [`SendData`], but any [`Transport`] works — including, in
/// tests, an in-process loopback that hands `Invoke` messages directly to a
/// peer `Communicator`'s [`Communicator::reply_data`].
pub struct Communicator<T: Transport> {
    transport: T,
    provider: RwLock<Provider>,
    pending: PendingCalls,
    gate: PendingCallGate,
    seq: AtomicU64,
    join: JoinCoordinator,
}

impl<T: Transport> Communicator<T> {
    pub fn new(transport: T) -> Arc<Self> {
        Self::with_pending_limit(transport, PendingCallLimit::default())
    }

    pub fn with_pending_limit(transport: T, limit: PendingCallLimit) -> Arc<Self> {
        Arc::new(Self {
            transport,
            provider: RwLock::new(Provider::Unset),
            pending: PendingCalls::new(),
            gate: PendingCallGate::new(limit),
            seq: AtomicU64::new(1),
            join: JoinCoordinator::new(),
        })
    }

    /// Installs (or replaces) the function tree this peer exposes to the
    /// remote side. Passing `None` sets the provider to the "explicitly
    /// empty" state rather than leaving it unset.
    pub fn set_provider(&self, root: Option<ProviderNode>) {
        let next = match root {
            Some(root) => Provider::installed(root),
            None => Provider::Empty,
        };
        *self.provider.write().expect("provider lock poisoned") = next;
    }

    pub fn get_provider(&self) -> Provider {
        self.provider.read().expect("provider lock poisoned").clone()
    }

    /// Exposes the underlying transport, e.g. so an embedder can drive its
    /// connection-specific setup (wiring a socket, flipping a `Connector` to
    /// `Open`) after construction.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a cheaply cloneable handle for issuing outbound calls.
    pub fn get_driver(self: &Arc<Self>) -> Driver {
        Driver::new(self.clone() as Arc<dyn CallIssuer>)
    }

    /// Waits until this communicator has finished tearing down (see
    /// [`Self::destructor`]), with no deadline.
    pub async fn join(&self) {
        self.join.wait().await;
    }

    /// As [`Self::join`], but returns `false` if `timeout` elapses first.
    pub async fn join_for(&self, timeout: Duration) -> bool {
        self.join.wait_for(timeout).await
    }

    /// As [`Self::join_for`], but with an absolute deadline.
    pub async fn join_until(&self, deadline: tokio::time::Instant) -> bool {
        self.join.wait_until(deadline).await
    }

    pub fn is_closed(&self) -> bool {
        self.join.is_closed()
    }

    /// Feeds one message received off the wire into this communicator:
    /// dispatches calls against the installed provider, or settles the
    /// matching pending call for a reply.
    #[instrument(skip(self, message), fields(uid = message.uid()))]
    pub async fn reply_data(&self, message: Invoke) -> Result<(), CommunicatorError> {
        match message {
            Invoke::Function(call) => self.handle_incoming_call(call).await,
            Invoke::Return(ret) => {
                self.settle(ret);
                Ok(())
            }
        }
    }

    async fn handle_incoming_call(&self, call: IFunction) -> Result<(), CommunicatorError> {
        let provider = self.get_provider();
        let args: Vec<Value> = call.parameters.into_iter().map(|p| p.value).collect();

        let reply = match dispatch::resolve(&provider, &call.listener) {
            Ok(function) => match function.call(args).await {
                Ok(value) => IReturn {
                    uid: call.uid,
                    success: true,
                    value,
                },
                Err(failure) => IReturn {
                    uid: call.uid,
                    success: false,
                    value: failure.to_wire(),
                },
            },
            Err(err) => {
                debug!(listener = %call.listener, error = %err, "dispatch failed");
                IReturn {
                    uid: call.uid,
                    success: false,
                    value: serialize_failure(&err),
                }
            }
        };

        self.transport.send_data(Invoke::Return(reply)).await
    }

    fn settle(&self, ret: IReturn) {
        let Some(tx) = self.pending.take(ret.uid) else {
            debug!(uid = ret.uid, "reply for unknown or already-settled call, dropping");
            return;
        };
        self.gate.release();
        let outcome = if ret.success {
            Ok(ret.value)
        } else {
            Err(RpcError::Remote(RpcFailure::from_wire(ret.value)))
        };
        let _ = tx.send(outcome);
    }

    async fn call_function_impl(&self, listener: &str, args: Vec<Value>) -> Result<Value, RpcError> {
        if self.is_closed() {
            return Err(RpcError::Local(CommunicatorError::Teardown(
                "communicator already destroyed".into(),
            )));
        }
        if !self.gate.try_acquire() {
            return Err(RpcError::Local(CommunicatorError::TooManyPending {
                limit: self.gate_limit(),
            }));
        }

        let uid = self.seq.fetch_add(1, Ordering::Relaxed);
        let rx = self.pending.register(uid);
        let parameters = args.into_iter().map(IParameter::new).collect();
        let call = Invoke::Function(IFunction {
            uid,
            listener: listener.to_string(),
            parameters,
        });

        if let Err(err) = self.transport.send_data(call).await {
            self.gate.release();
            if let Some(tx) = self.pending.take(uid) {
                drop(tx);
            }
            return Err(RpcError::Local(err));
        }

        match rx.await {
            Ok(outcome) => outcome,
            Err(_recv_dropped) => Err(RpcError::Local(CommunicatorError::Teardown(
                "communicator destroyed before reply arrived".into(),
            ))),
        }
    }

    fn gate_limit(&self) -> usize {
        self.gate.limit().max()
    }

    /// Idempotently tears the communicator down: every outstanding call is
    /// settled with `err` (defaulting to [`CommunicatorError::Teardown`] with
    /// the message `"Connection has been closed."`), further calls are
    /// refused, and any [`Self::join`] waiters are released.
    #[instrument(skip(self, err))]
    pub fn destructor(&self, err: Option<CommunicatorError>) {
        if self.join.is_closed() {
            return;
        }
        let err = err.unwrap_or_else(|| CommunicatorError::Teardown("Connection has been closed.".into()));
        self.pending.drain_with(|| Err(RpcError::Local(err.clone())));
        self.join.close();
    }
}

#[async_trait]
impl<T: Transport> CallIssuer for Communicator<T> {
    async fn issue_call(&self, listener: &str, args: Vec<Value>) -> Result<Value, RpcError> {
        self.call_function_impl(listener, args).await
    }
}

impl<T: Transport> Drop for Communicator<T> {
    fn drop(&mut self) {
        if !self.join.is_closed() {
            warn!("Communicator dropped without an explicit destructor() call");
            self.destructor(None);
        }
    }
}
