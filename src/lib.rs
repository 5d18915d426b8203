//! `spark-rfc-core`: a transport-agnostic Remote Function Call (RFC) runtime.
//!
//! Two peers connected by *any* bidirectional message channel can invoke each
//! other's functions as if they were local, including nested member paths
//! (`driver.path("a.b.c").call(args)`), with results and thrown errors
//! returned asynchronously. This crate supplies the symmetric core — the
//! [`Communicator`](communicator::Communicator) — that:
//!
//! - multiplexes concurrent in-flight calls over a single channel ([`pending`]),
//! - dispatches incoming calls against a locally supplied [`provider`],
//!   including nested path resolution and access-control filtering
//!   ([`dispatch`]),
//! - synthesizes a client-side call proxy for outbound calls ([`driver`]),
//! - serializes thrown errors onto the wire ([`error`]),
//! - and coordinates graceful shutdown of in-flight work ([`join`]).
//!
//! A thin lifecycle gate, [`Connector`](connector::Connector), sits on top to
//! refuse calls and joins outside the `Open` state.
//!
//! This crate is deliberately agnostic of the concrete transport (WebSocket,
//! TCP, in-process channel, ...), the wire codec (assumed JSON-equivalent —
//! see [`value::Value`]), authentication, and schema validation of
//! parameters. Implementers plug a transport in by implementing
//! [`transport::SendData`] and handing it to [`Connector::new`](connector::Connector::new).

pub mod communicator;
pub mod connector;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod invoke;
pub mod join;
pub mod limits;
pub mod pending;
pub mod provider;
pub mod transport;
pub mod value;

pub use communicator::Communicator;
pub use connector::{Connector, ConnectorState};
pub use driver::{Driver, PathHandle};
pub use error::{CommunicatorError, RpcError, RpcFailure};
pub use invoke::{CallId, IFunction, IParameter, IReturn, Invoke};
pub use limits::PendingCallLimit;
pub use provider::{Provider, ProviderNode, RemoteFunction};
pub use transport::{SendData, Transport};
pub use value::Value;
