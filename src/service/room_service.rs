//! Room service: validates requests and drives the broadcast adaptor.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{BroadcastAdaptor, SendReport, Socket, SocketHandle, SocketId};
use crate::error::GatewayError;

/// Member count of a single room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    /// Room name.
    pub room: String,
    /// Number of sockets currently in the room.
    pub members: usize,
}

/// Orchestration layer for room operations.
///
/// Owns a shared [`BroadcastAdaptor`] and adds what the adaptor contract
/// deliberately leaves out: room name validation, membership logging, and
/// leaving every room when a socket disconnects.
#[derive(Debug, Clone)]
pub struct RoomService {
    adaptor: Arc<dyn BroadcastAdaptor>,
    max_room_name_len: usize,
}

impl RoomService {
    /// Creates a new `RoomService`.
    #[must_use]
    pub fn new(adaptor: Arc<dyn BroadcastAdaptor>, max_room_name_len: usize) -> Self {
        Self {
            adaptor,
            max_room_name_len,
        }
    }

    /// Returns a reference to the inner adaptor.
    #[must_use]
    pub fn adaptor(&self) -> &Arc<dyn BroadcastAdaptor> {
        &self.adaptor
    }

    /// Checks that `room` is usable as a room name.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the name is empty, too
    /// long, or contains control characters.
    pub fn validate_room(&self, room: &str) -> Result<(), GatewayError> {
        if room.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "room name must not be empty".to_string(),
            ));
        }
        if room.chars().count() > self.max_room_name_len {
            return Err(GatewayError::InvalidRequest(format!(
                "room name exceeds {} characters",
                self.max_room_name_len
            )));
        }
        if room.chars().any(char::is_control) {
            return Err(GatewayError::InvalidRequest(
                "room name must not contain control characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Adds `socket` to `room` and returns every room it is now in.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the room name is invalid or the
    /// adaptor rejects the socket.
    pub async fn join(
        &self,
        room: &str,
        socket: SocketHandle,
    ) -> Result<Vec<String>, GatewayError> {
        self.validate_room(room)?;
        let socket_id = socket.id().clone();
        self.adaptor.join(room, Arc::clone(&socket)).await?;
        tracing::info!(%socket_id, room, "socket joined room");

        let mut rooms = self.adaptor.rooms(Some(&*socket)).await;
        rooms.sort();
        Ok(rooms)
    }

    /// Removes `socket` from `room`. Leaving a room you are not in is fine.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the room name is invalid or the
    /// adaptor rejects the socket.
    pub async fn leave(&self, room: &str, socket: &dyn Socket) -> Result<(), GatewayError> {
        self.validate_room(room)?;
        self.adaptor.leave(room, socket).await?;
        tracing::info!(socket_id = %socket.id(), room, "socket left room");
        Ok(())
    }

    /// Emits `event` to `room`, skipping `from` when given.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the room name is invalid or the
    /// adaptor fails.
    pub async fn emit(
        &self,
        from: Option<&dyn Socket>,
        room: &str,
        event: &str,
        args: &[Value],
    ) -> Result<SendReport, GatewayError> {
        self.validate_room(room)?;
        if event.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "event name must not be empty".to_string(),
            ));
        }
        let report = self.adaptor.send(from, room, event, args).await?;
        tracing::debug!(
            room,
            event,
            delivered = report.delivered,
            failed = report.failed,
            "room event sent"
        );
        Ok(report)
    }

    /// Sorted rooms `socket` is in.
    pub async fn rooms_of(&self, socket: &dyn Socket) -> Vec<String> {
        let mut rooms = self.adaptor.rooms(Some(socket)).await;
        rooms.sort();
        rooms
    }

    /// Removes `socket` from every room it joined.
    ///
    /// Returns the number of rooms left. Failures are logged and skipped so
    /// one bad room cannot leave the socket registered elsewhere.
    pub async fn disconnect(&self, socket: &dyn Socket) -> usize {
        let rooms = self.adaptor.rooms(Some(socket)).await;
        let mut left = 0;
        for room in &rooms {
            match self.adaptor.leave(room, socket).await {
                Ok(()) => left += 1,
                Err(err) => {
                    tracing::warn!(
                        socket_id = %socket.id(),
                        room,
                        error = %err,
                        "leave on disconnect failed"
                    );
                }
            }
        }
        tracing::info!(socket_id = %socket.id(), rooms = left, "socket disconnected");
        left
    }

    /// Summaries of every room, sorted by name.
    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        let mut rooms = self.adaptor.list_of_rooms().await;
        rooms.sort();
        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            let members = self.adaptor.number_in_room(&room).await;
            // A room can empty out between the listing and the count.
            if members > 0 {
                summaries.push(RoomSummary { room, members });
            }
        }
        summaries
    }

    /// Sorted member ids of `room`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RoomNotFound`] if the room has no members.
    pub async fn members(&self, room: &str) -> Result<Vec<SocketId>, GatewayError> {
        let clients = self.adaptor.clients(room).await;
        if clients.is_empty() {
            return Err(GatewayError::RoomNotFound(room.to_string()));
        }
        let mut ids: Vec<SocketId> = clients.into_keys().collect();
        ids.sort();
        Ok(ids)
    }

    /// Number of rooms currently tracked.
    pub async fn room_count(&self) -> usize {
        self.adaptor.number_of_rooms().await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::RoomRegistry;
    use crate::domain::socket::testing::RecordingSocket;

    fn service() -> RoomService {
        RoomService::new(Arc::new(RoomRegistry::new()), 16)
    }

    #[test]
    fn validate_room_rules() {
        let svc = service();
        assert!(svc.validate_room("lobby").is_ok());
        assert!(svc.validate_room("").is_err());
        assert!(svc.validate_room("x".repeat(17).as_str()).is_err());
        assert!(svc.validate_room("bad\nname").is_err());
    }

    #[tokio::test]
    async fn join_returns_sorted_rooms() {
        let svc = service();
        let a = RecordingSocket::new("a");

        let _ = svc.join("vip", a.handle()).await;
        let Ok(rooms) = svc.join("lobby", a.handle()).await else {
            panic!("join failed");
        };
        assert_eq!(rooms, vec!["lobby", "vip"]);
    }

    #[tokio::test]
    async fn join_rejects_invalid_room() {
        let svc = service();
        let a = RecordingSocket::new("a");
        let result = svc.join("", a.handle()).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
        assert_eq!(svc.room_count().await, 0);
    }

    #[tokio::test]
    async fn emit_skips_sender() {
        let svc = service();
        let a = RecordingSocket::new("a");
        let b = RecordingSocket::new("b");
        let _ = svc.join("lobby", a.handle()).await;
        let _ = svc.join("lobby", b.handle()).await;

        let Ok(report) = svc
            .emit(Some(a.as_socket()), "lobby", "chat", &[json!("hi")])
            .await
        else {
            panic!("emit failed");
        };
        assert_eq!(report.delivered, 1);
        assert!(a.received().is_empty());
        assert_eq!(b.received(), vec![("chat".to_string(), vec![json!("hi")])]);
    }

    #[tokio::test]
    async fn emit_rejects_empty_event() {
        let svc = service();
        let result = svc.emit(None, "lobby", "", &[]).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn disconnect_leaves_every_room() {
        let svc = service();
        let a = RecordingSocket::new("a");
        let b = RecordingSocket::new("b");
        let _ = svc.join("lobby", a.handle()).await;
        let _ = svc.join("vip", a.handle()).await;
        let _ = svc.join("lobby", b.handle()).await;

        assert_eq!(svc.disconnect(a.as_socket()).await, 2);
        assert!(svc.rooms_of(a.as_socket()).await.is_empty());
        assert_eq!(
            svc.list_rooms().await,
            vec![RoomSummary {
                room: "lobby".to_string(),
                members: 1
            }]
        );
    }

    #[tokio::test]
    async fn members_of_missing_room_is_not_found() {
        let svc = service();
        let result = svc.members("ghost").await;
        assert!(matches!(result, Err(GatewayError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn members_are_sorted() {
        let svc = service();
        let b = RecordingSocket::new("b");
        let a = RecordingSocket::new("a");
        let _ = svc.join("lobby", b.handle()).await;
        let _ = svc.join("lobby", a.handle()).await;

        let Ok(members) = svc.members("lobby").await else {
            panic!("room should exist");
        };
        assert_eq!(members, vec![SocketId::new("a"), SocketId::new("b")]);
    }
}
