//! WebSocket connection state machine.
//!
//! Each connection is split in two. The reader half (this task) parses
//! client commands and drives the [`RoomService`]. The writer half (a
//! spawned task) drains the connection's outbound queue into the socket.
//! The halves are tied together by the transport wrappers: closing the
//! [`ConnReader`] tells the writer to stop, and the writer's
//! [`ConnWriter`] releases the connection's write lock once the sink is
//! closed.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::{RwLock, mpsc};

use super::messages::{Outbound, WsCommand, WsMessage, WsMessageType};
use super::socket::WsSocket;
use crate::domain::{Socket, SocketHandle, SocketId};
use crate::service::RoomService;
use crate::transport::{ConnReader, ConnWriter};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Assigns a fresh [`SocketId`] and announces it with a `connect` event.
/// - Reads commands from the client and replies to each one.
/// - Leaves every room when the client goes away.
pub async fn run_connection(socket: WebSocket, room_service: Arc<RoomService>, buffer: usize) {
    let (ws_tx, ws_rx) = socket.split();
    let (outbound_tx, outbound_rx) = mpsc::channel(buffer.max(1));
    let (close_tx, close_rx) = mpsc::channel(1);

    let ws_socket = Arc::new(WsSocket::new(SocketId::generate(), outbound_tx));
    let socket_id = ws_socket.id().clone();
    tracing::debug!(%socket_id, "ws connection opened");

    let write_lock = Arc::new(RwLock::new(()));
    let guard = Arc::clone(&write_lock).write_owned().await;
    let writer = tokio::spawn(write_loop(
        ConnWriter::new(ws_tx, guard),
        outbound_rx,
        close_rx,
    ));

    if let Err(err) = ws_socket.emit("connect", &[json!(socket_id)]) {
        tracing::warn!(%socket_id, error = %err, "could not queue connect event");
    }

    let mut reader = ConnReader::new(ws_rx, close_tx);
    while let Some(msg) = reader.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply = handle_text_message(&text, &ws_socket, &room_service).await;
                if !ws_socket.reply(Outbound::Reply(reply)).await {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(err) => {
                tracing::debug!(%socket_id, error = %err, "ws read failed");
                break;
            }
            Ok(_) => {}
        }
    }

    room_service.disconnect(&*ws_socket).await;
    reader.close().await;

    // The writer holds the lock until its sink is closed.
    drop(write_lock.write().await);
    if let Err(err) = writer.await {
        tracing::warn!(%socket_id, error = %err, "ws writer task failed");
    }

    tracing::debug!(%socket_id, "ws connection closed");
}

/// Forwards queued frames to the client until told to stop.
async fn write_loop(
    mut writer: ConnWriter<SplitSink<WebSocket, Message>>,
    mut outbound_rx: mpsc::Receiver<Outbound>,
    mut close_rx: mpsc::Receiver<()>,
) {
    loop {
        tokio::select! {
            frame = outbound_rx.recv() => {
                let Some(frame) = frame else {
                    break;
                };
                if let Err(err) = writer.send(Message::text(frame.into_json())).await {
                    tracing::debug!(error = %err, "ws send failed");
                    break;
                }
            }
            _ = close_rx.recv() => break,
        }
    }

    if let Err(err) = SinkExt::<Message>::close(&mut writer).await {
        tracing::debug!(error = %err, "ws close failed");
    }
}

/// Handles a text message from the client, returning the reply frame.
async fn handle_text_message(
    text: &str,
    socket: &Arc<WsSocket>,
    room_service: &RoomService,
) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command message");
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 404, "unknown command");
    };

    let result = match command {
        WsCommand::Join { room } => room_service
            .join(&room, Arc::clone(socket) as SocketHandle)
            .await
            .map(|rooms| json!({ "joined": room, "rooms": rooms })),
        WsCommand::Leave { room } => room_service
            .leave(&room, &**socket)
            .await
            .map(|()| json!({ "left": room })),
        WsCommand::Emit {
            room,
            event,
            args,
            include_self,
        } => {
            let ignore: Option<&dyn Socket> = if include_self {
                None
            } else {
                Some(&**socket)
            };
            room_service
                .emit(ignore, &room, &event, &args)
                .await
                .map(|report| {
                    json!({
                        "room": room,
                        "event": event,
                        "delivered": report.delivered,
                        "failed": report.failed,
                    })
                })
        }
        WsCommand::Rooms => Ok(json!({ "rooms": room_service.rooms_of(&**socket).await })),
    };

    match result {
        Ok(payload) => WsMessage::new(msg.id, WsMessageType::Response, payload),
        Err(err) => WsMessage::error(msg.id, err.error_code(), &err.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{BroadcastAdaptor, RoomRegistry};

    fn setup() -> (RoomService, Arc<WsSocket>, mpsc::Receiver<Outbound>) {
        let service = RoomService::new(Arc::new(RoomRegistry::new()), 32);
        let (tx, rx) = mpsc::channel(8);
        let socket = Arc::new(WsSocket::new(SocketId::new("a"), tx));
        (service, socket, rx)
    }

    fn command(id: &str, payload: serde_json::Value) -> String {
        json!({ "id": id, "type": "command", "payload": payload }).to_string()
    }

    fn error_code(msg: &WsMessage) -> Option<u64> {
        msg.payload.get("code").and_then(serde_json::Value::as_u64)
    }

    #[tokio::test]
    async fn join_replies_with_rooms() {
        let (service, socket, _rx) = setup();
        let text = command("c1", json!({ "command": "join", "room": "lobby" }));

        let reply = handle_text_message(&text, &socket, &service).await;
        assert_eq!(reply.id, "c1");
        assert_eq!(reply.msg_type, WsMessageType::Response);
        assert_eq!(reply.payload.get("rooms"), Some(&json!(["lobby"])));
        assert!(service.adaptor().has("lobby", Some(&*socket)).await);
    }

    #[tokio::test]
    async fn emit_excludes_sender_unless_asked() {
        let (service, a, mut a_rx) = setup();
        let (b_tx, mut b_rx) = mpsc::channel(8);
        let b = Arc::new(WsSocket::new(SocketId::new("b"), b_tx));
        let _ = service.join("lobby", Arc::clone(&a) as SocketHandle).await;
        let _ = service.join("lobby", Arc::clone(&b) as SocketHandle).await;

        let text = command(
            "c2",
            json!({ "command": "emit", "room": "lobby", "event": "chat", "args": ["hi"] }),
        );
        let reply = handle_text_message(&text, &a, &service).await;
        assert_eq!(reply.payload.get("delivered"), Some(&json!(1)));
        assert!(a_rx.try_recv().is_err());
        let Ok(Outbound::Event(event)) = b_rx.try_recv() else {
            panic!("b should have received the event");
        };
        assert_eq!(event.event, "chat");

        let text = command(
            "c3",
            json!({ "command": "emit", "room": "lobby", "event": "chat", "include_self": true }),
        );
        let reply = handle_text_message(&text, &a, &service).await;
        assert_eq!(reply.payload.get("delivered"), Some(&json!(2)));
        assert!(a_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn leave_and_rooms_round_trip() {
        let (service, socket, _rx) = setup();
        let join = command("c1", json!({ "command": "join", "room": "lobby" }));
        let leave = command("c2", json!({ "command": "leave", "room": "lobby" }));
        let rooms = command("c3", json!({ "command": "rooms" }));

        let _ = handle_text_message(&join, &socket, &service).await;
        let left = handle_text_message(&leave, &socket, &service).await;
        assert_eq!(left.payload.get("left"), Some(&json!("lobby")));

        let listed = handle_text_message(&rooms, &socket, &service).await;
        assert_eq!(listed.payload.get("rooms"), Some(&json!([])));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let (service, socket, _rx) = setup();
        let reply = handle_text_message("{not json", &socket, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Error);
        assert_eq!(error_code(&reply), Some(400));
    }

    #[tokio::test]
    async fn unknown_command_is_rejected() {
        let (service, socket, _rx) = setup();
        let text = command("c1", json!({ "command": "swap" }));
        let reply = handle_text_message(&text, &socket, &service).await;
        assert_eq!(reply.id, "c1");
        assert_eq!(error_code(&reply), Some(404));
    }

    #[tokio::test]
    async fn invalid_room_reports_validation_code() {
        let (service, socket, _rx) = setup();
        let text = command("c1", json!({ "command": "join", "room": "" }));
        let reply = handle_text_message(&text, &socket, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Error);
        assert_eq!(error_code(&reply), Some(1001));
    }
}
