//! The two seams a transport implementation plugs into: sending serialized
//! invokes out, and the (symmetric) obligation of accepting them.
use async_trait::async_trait;

use crate::error::CommunicatorError;
use crate::invoke::Invoke;

/// What a [`crate::communicator::Communicator`] needs from its transport: the
/// ability to hand a message to the peer. Receiving is the mirror image —
/// the embedder calls [`crate::communicator::Communicator::reply_data`]
/// whenever a message arrives off the wire — so it isn't part of this trait.
#[async_trait]
pub trait SendData: Send + Sync {
    async fn send_data(&self, message: Invoke) -> Result<(), CommunicatorError>;
}

/// A [`SendData`] that can also report whether it's currently willing to
/// send. [`crate::connector::Connector`] is the canonical implementor: it
/// wraps an inner `SendData` and adds a lifecycle gate in front of it.
#[async_trait]
pub trait Transport: SendData {
    fn is_ready(&self) -> bool;
}
