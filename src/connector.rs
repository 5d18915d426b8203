//! A lifecycle gate in front of a transport: refuses sends outside the
//! `Open` state with the same diagnostics a caller would get from the
//! underlying connection object directly.
//!
//! Composition, not inheritance: the source runtime's `Connector` subclasses
//! its communicator base class. Rust has no implementation inheritance, so
//! instead `Connector<S, H>` itself implements [`Transport`] and wraps an
//! inner [`SendData`] — the same `Layer<S, Request>`-wraps-`Service<Request>`
//! shape used elsewhere in this codebase for composable middleware.
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use tracing::instrument;

use crate::error::CommunicatorError;
use crate::invoke::Invoke;
use crate::transport::{SendData, Transport};

/// The states a connection-backed transport moves through:
/// `None < Connecting < Open < Closing < Closed`. `None` is the initial
/// state before any connection attempt has begun; there is no path back to
/// an earlier state once advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectorState {
    None = 0,
    Connecting = 1,
    Open = 2,
    Closing = 3,
    Closed = 4,
}

impl ConnectorState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ConnectorState::None,
            1 => ConnectorState::Connecting,
            2 => ConnectorState::Open,
            3 => ConnectorState::Closing,
            _ => ConnectorState::Closed,
        }
    }

    /// The diagnostic a caller sees when attempting to send while in this
    /// state. `Open` never appears here because a send from `Open` succeeds.
    fn not_ready_reason(self) -> &'static str {
        match self {
            ConnectorState::None => "connect first.",
            ConnectorState::Connecting => "it's on connecting, wait for a second.",
            ConnectorState::Open => unreachable!("Open is always ready"),
            ConnectorState::Closing => "the connection is on closing.",
            ConnectorState::Closed => "the connection has been closed.",
        }
    }
}

/// Marker trait for the handle type a `Connector` carries alongside its
/// inner transport (a socket, a channel sender, whatever identifies "the
/// connection" to the embedder). `Connector` never inspects `H` itself.
pub trait ConnectionHandle: Send + Sync {}
impl<T: Send + Sync> ConnectionHandle for T {}

/// Wraps an inner [`SendData`] with an explicit open/closing state machine,
/// refusing to send outside [`ConnectorState::Open`].
pub struct Connector<S: SendData, H: ConnectionHandle> {
    inner: S,
    handle: H,
    state: AtomicU8,
}

impl<S: SendData, H: ConnectionHandle> Connector<S, H> {
    /// Builds a connector in [`ConnectorState::None`] — no connection
    /// attempt has begun yet.
    pub fn new(inner: S, handle: H) -> Self {
        Self {
            inner,
            handle,
            state: AtomicU8::new(ConnectorState::None as u8),
        }
    }

    pub fn state(&self) -> ConnectorState {
        ConnectorState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Moves the connector to [`ConnectorState::Connecting`]. Called when
    /// the embedder begins the underlying connection attempt.
    pub fn mark_connecting(&self) {
        self.state.store(ConnectorState::Connecting as u8, Ordering::Release);
    }

    /// Moves the connector to [`ConnectorState::Open`]. Called once the
    /// embedder's underlying connection handshake completes.
    pub fn mark_open(&self) {
        self.state.store(ConnectorState::Open as u8, Ordering::Release);
    }

    /// Begins graceful close: sends are refused from here on, but whatever
    /// is already in flight is left for the embedder to drain.
    pub fn mark_closing(&self) {
        self.state.store(ConnectorState::Closing as u8, Ordering::Release);
    }

    pub fn mark_closed(&self) {
        self.state.store(ConnectorState::Closed as u8, Ordering::Release);
    }

    /// Returns `Err` with the diagnostic matching the current state, unless
    /// currently `Open`.
    fn inspect_ready(&self) -> Result<(), CommunicatorError> {
        let state = self.state();
        if state == ConnectorState::Open {
            return Ok(());
        }
        Err(CommunicatorError::NotReady {
            subclass: "Connector",
            method: "send_data",
            reason: state.not_ready_reason(),
        })
    }
}

#[async_trait]
impl<S: SendData, H: ConnectionHandle> SendData for Connector<S, H> {
    #[instrument(skip(self, message))]
    async fn send_data(&self, message: Invoke) -> Result<(), CommunicatorError> {
        self.inspect_ready()?;
        self.inner.send_data(message).await
    }
}

#[async_trait]
impl<S: SendData, H: ConnectionHandle> Transport for Connector<S, H> {
    fn is_ready(&self) -> bool {
        self.state() == ConnectorState::Open
    }
}
