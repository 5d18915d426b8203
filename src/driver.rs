//! The client-side call surface.
//!
//! The source runtime lets callers write `proxy.a.b.c(args)`, relying on
//! dynamic attribute interception to build up the path as you go. Rust has
//! no analogous hook, so we expose the same capability through an explicit
//! builder instead: `driver.path("a.b.c").call(args)`.
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RpcError;
use crate::value::Value;

/// What [`Driver`] needs from its owning communicator to actually issue a
/// call and await the reply. Kept as a narrow trait so `Driver` doesn't need
/// a generic parameter over the transport type.
#[async_trait]
pub(crate) trait CallIssuer: Send + Sync {
    async fn issue_call(&self, listener: &str, args: Vec<Value>) -> Result<Value, RpcError>;
}

/// The handle callers use to make outbound calls against a communicator's
/// peer. Cheaply cloneable — internally just an `Arc` to the issuing
/// communicator.
#[derive(Clone)]
pub struct Driver {
    issuer: Arc<dyn CallIssuer>,
}

impl Driver {
    pub(crate) fn new(issuer: Arc<dyn CallIssuer>) -> Self {
        Self { issuer }
    }

    /// Begins addressing a remote function by its dot-separated path.
    pub fn path(&self, listener: impl Into<String>) -> PathHandle {
        PathHandle {
            issuer: self.issuer.clone(),
            listener: listener.into(),
        }
    }
}

/// A resolved call target, ready to be invoked with [`PathHandle::call`].
pub struct PathHandle {
    issuer: Arc<dyn CallIssuer>,
    listener: String,
}

impl PathHandle {
    /// Issues the call with the given positional arguments and awaits the
    /// reply (or the local/remote failure that prevented one).
    pub async fn call(&self, args: Vec<Value>) -> Result<Value, RpcError> {
        self.issuer.issue_call(&self.listener, args).await
    }
}
