//! Error surfaces: local failures raised by this crate, and the wire
//! encoding of errors thrown by a remote callee.
use thiserror::Error;

use crate::value::Value;

/// An error thrown by a remote callee, as carried back over the wire.
///
/// Mirrors the shape the source runtime's error objects serialize to: a
/// `name`, a `message`, and whatever extra enumerable fields the thrower
/// attached. We keep the raw [`Value`] rather than trying to reconstruct a
/// typed exception hierarchy locally — callers that care inspect `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcFailure {
    pub name: String,
    pub message: String,
    pub extra: Value,
}

impl RpcFailure {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            extra: Value::Null,
        }
    }

    /// Reconstructs a failure from whatever value a remote `IReturn.value`
    /// carried when `success` was `false`. Tolerates a callee that threw a
    /// bare string or number instead of an Error-shaped object.
    pub fn from_wire(value: Value) -> Self {
        match &value {
            Value::Object(map) => {
                let name = map
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("Error")
                    .to_string();
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                RpcFailure {
                    name,
                    message,
                    extra: value,
                }
            }
            Value::String(s) => RpcFailure::new("Error", s.clone()),
            other => RpcFailure::new("Error", other.to_string()),
        }
    }

    /// Encodes this failure the way it would appear as an `IReturn.value`.
    pub fn to_wire(&self) -> Value {
        if let Value::Object(_) = &self.extra {
            self.extra.clone()
        } else {
            serde_json::json!({ "name": self.name, "message": self.message })
        }
    }
}

impl std::fmt::Display for RpcFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for RpcFailure {}

/// The outcome of an issued call: either the callee's return value, or its
/// thrown error, or a local failure that prevented the call from completing
/// (disconnect, shutdown, timeout).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcError {
    #[error("remote call threw: {0}")]
    Remote(#[from] RpcFailure),
    #[error(transparent)]
    Local(#[from] CommunicatorError),
}

/// Failures raised locally by a [`crate::communicator::Communicator`] or
/// [`crate::connector::Connector`], never seen by the remote peer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommunicatorError {
    /// Dispatch or send was attempted while a precondition the subclass
    /// documents was not met (e.g. connector not yet open).
    #[error("{subclass}#{method}: {reason}")]
    NotReady {
        subclass: &'static str,
        method: &'static str,
        reason: &'static str,
    },

    /// A path resolved to nothing callable, or access control rejected a
    /// segment of the path.
    #[error("no function bound at '{listener}'")]
    NoSuchFunction { listener: String },

    /// The provider was never installed (`Provider::Unset`).
    #[error("provider not specified yet")]
    ProviderNotSpecified,

    /// The provider was explicitly installed as empty (`Provider::Empty`).
    #[error("provider would not be")]
    ProviderEmpty,

    /// The provider rejected access to a path segment (underscore-prefixed,
    /// `constructor`, `prototype`, `__proto__`, `__class__`, ...).
    #[error("access to '{listener}' is not permitted")]
    AccessDenied { listener: String },

    /// The communicator tore down (locally or because the peer disconnected)
    /// while this call was still outstanding.
    #[error("communicator destroyed while call was pending: {0}")]
    Teardown(String),

    /// A [`crate::limits::PendingCallLimit`] was exceeded.
    #[error("pending call limit of {limit} exceeded")]
    TooManyPending { limit: usize },

    /// The transport failed to accept or deliver a message.
    #[error("transport send failed: {0}")]
    SendFailed(String),
}

/// Builds the `IReturn.value` for a locally thrown error, i.e. what gets
/// sent back to the *caller* when dispatch fails on our side.
pub fn serialize_failure(err: &CommunicatorError) -> Value {
    serde_json::json!({ "name": "Error", "message": err.to_string() })
}
