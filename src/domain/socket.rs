//! The socket capability consumed by the room registry.
//!
//! A [`Socket`] is a peer endpoint owned by some transport. The registry
//! only stores [`SocketHandle`]s and calls [`Socket::emit`] during a send;
//! it never connects, closes or otherwise manages a socket's lifetime.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::SocketId;

/// Why a single emit could not be handed off to a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    /// The socket's outbound queue is full.
    #[error("socket outbound queue is full")]
    Full,

    /// The socket's connection has already gone away.
    #[error("socket is closed")]
    Closed,
}

/// A connected peer that can receive room events.
///
/// # Re-entrance
///
/// [`Socket::emit`] is invoked while the registry holds its shared read
/// lock. Implementations must only hand the event off (e.g. push into a
/// queue); they must never call back into the registry's join or leave,
/// which would wait on the write lock forever.
pub trait Socket: Send + Sync + fmt::Debug {
    /// Stable, unique id of this peer.
    fn id(&self) -> &SocketId;

    /// Delivers `event` with `args` to the peer without blocking.
    ///
    /// # Errors
    ///
    /// Returns an [`EmitError`] if the event could not be queued.
    fn emit(&self, event: &str, args: &[Value]) -> Result<(), EmitError>;
}

/// Shared, lookup-only handle to a socket stored in a room.
pub type SocketHandle = Arc<dyn Socket>;
