//! In-memory room registry with a single registry-wide lock.
//!
//! [`RoomRegistry`] maps room names to the sockets that joined them. One
//! [`tokio::sync::RwLock`] guards the whole map: join and leave take it
//! exclusively, every read (including the send fan-out) shares it.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::adaptor::{BroadcastAdaptor, SendReport};
use super::{Socket, SocketHandle, SocketId};
use crate::error::BroadcastError;

type Members = HashMap<SocketId, SocketHandle>;

/// Process-local [`BroadcastAdaptor`].
///
/// # Invariants
///
/// - A room present in the map always has at least one member.
/// - A socket id appears at most once per room.
///
/// # Concurrency
///
/// Room counts are expected to be small relative to membership churn, so a
/// single lock is used instead of per-room locks. Sends fan out under the
/// read lock; see [`Socket`] for the re-entrance rule this implies.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Members>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Returns `true` if no room currently has members.
    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn check_socket(socket: &dyn Socket) -> Result<(), BroadcastError> {
    if socket.id().is_empty() {
        return Err(BroadcastError::InvalidSocket(
            "socket id must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl BroadcastAdaptor for RoomRegistry {
    async fn rooms(&self, socket: Option<&dyn Socket>) -> Vec<String> {
        let map = self.rooms.read().await;
        match socket {
            None => map.keys().cloned().collect(),
            Some(socket) => map
                .iter()
                .filter(|(_, members)| members.contains_key(socket.id()))
                .map(|(room, _)| room.clone())
                .collect(),
        }
    }

    async fn has(&self, room: &str, socket: Option<&dyn Socket>) -> bool {
        let map = self.rooms.read().await;
        let Some(members) = map.get(room) else {
            return false;
        };
        socket.is_none_or(|socket| members.contains_key(socket.id()))
    }

    async fn join(&self, room: &str, socket: SocketHandle) -> Result<(), BroadcastError> {
        check_socket(&*socket)?;
        let mut map = self.rooms.write().await;
        let id = socket.id().clone();
        map.entry(room.to_string()).or_default().insert(id, socket);
        Ok(())
    }

    async fn leave(&self, room: &str, socket: &dyn Socket) -> Result<(), BroadcastError> {
        check_socket(socket)?;
        let mut map = self.rooms.write().await;
        let Some(members) = map.get_mut(room) else {
            return Ok(());
        };
        members.remove(socket.id());
        if members.is_empty() {
            map.remove(room);
            tracing::debug!(room, "room emptied and removed");
        }
        Ok(())
    }

    async fn clients(&self, room: &str) -> HashMap<SocketId, SocketHandle> {
        let map = self.rooms.read().await;
        map.get(room).cloned().unwrap_or_default()
    }

    async fn send(
        &self,
        ignore: Option<&dyn Socket>,
        room: &str,
        event: &str,
        args: &[Value],
    ) -> Result<SendReport, BroadcastError> {
        let map = self.rooms.read().await;
        let mut report = SendReport::default();
        let Some(members) = map.get(room) else {
            return Ok(report);
        };
        let ignored = ignore.map(|socket| socket.id());
        for (id, socket) in members {
            if ignored == Some(id) {
                continue;
            }
            match socket.emit(event, args) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(socket_id = %id, room, event, error = %err, "emit failed");
                }
            }
        }
        Ok(report)
    }

    async fn number_in_room(&self, room: &str) -> usize {
        self.rooms.read().await.get(room).map_or(0, HashMap::len)
    }

    async fn number_of_rooms(&self) -> usize {
        self.rooms.read().await.len()
    }

    async fn list_of_rooms(&self) -> Vec<String> {
        self.rooms.read().await.keys().cloned().collect()
    }
}
