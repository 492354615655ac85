//! WebSocket-backed [`Socket`] implementation.

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::messages::{Outbound, OutboundEvent};
use crate::domain::{EmitError, Socket, SocketId};

/// A socket whose emits are queued for the connection's writer task.
///
/// [`Socket::emit`] never waits: it `try_send`s into the bounded outbound
/// queue and reports [`EmitError::Full`] when a slow client has fallen
/// behind.
#[derive(Debug)]
pub struct WsSocket {
    id: SocketId,
    outbound: mpsc::Sender<Outbound>,
}

impl WsSocket {
    /// Creates a socket that queues into `outbound`.
    #[must_use]
    pub fn new(id: SocketId, outbound: mpsc::Sender<Outbound>) -> Self {
        Self { id, outbound }
    }

    /// Queues a command reply, waiting for room in the queue.
    ///
    /// Returns `false` if the writer is gone.
    pub async fn reply(&self, frame: Outbound) -> bool {
        self.outbound.send(frame).await.is_ok()
    }
}

impl Socket for WsSocket {
    fn id(&self) -> &SocketId {
        &self.id
    }

    fn emit(&self, event: &str, args: &[Value]) -> Result<(), EmitError> {
        let frame = Outbound::Event(OutboundEvent {
            event: event.to_string(),
            args: args.to_vec(),
        });
        self.outbound.try_send(frame).map_err(|err| match err {
            TrySendError::Full(_) => EmitError::Full,
            TrySendError::Closed(_) => EmitError::Closed,
        })
    }
}
