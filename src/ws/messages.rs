//! WebSocket message types: envelope, commands, and outbound frames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    #[serde(default)]
    pub payload: Value,
}

impl WsMessage {
    /// Builds a server → client message stamped with the current time.
    #[must_use]
    pub fn new(id: String, msg_type: WsMessageType, payload: Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error frame with a numeric `code` and `message`.
    #[must_use]
    pub fn error(id: String, code: u32, message: &str) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({
                "code": code,
                "message": message,
            }),
        )
    }

    /// Serializes the message to its JSON text form.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client room event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Join a room.
    Join {
        /// Room name.
        room: String,
    },
    /// Leave a room.
    Leave {
        /// Room name.
        room: String,
    },
    /// Emit an event to every member of a room.
    Emit {
        /// Target room.
        room: String,
        /// Application event name.
        event: String,
        /// Event arguments.
        #[serde(default)]
        args: Vec<Value>,
        /// Also deliver the event back to the sender.
        #[serde(default)]
        include_self: bool,
    },
    /// List the rooms this connection is in.
    Rooms,
}

/// An event queued for delivery to one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    /// Application event name.
    pub event: String,
    /// Event arguments.
    pub args: Vec<Value>,
}

impl OutboundEvent {
    /// Wraps the event in an `event` envelope.
    #[must_use]
    pub fn into_message(self) -> WsMessage {
        WsMessage::new(
            uuid::Uuid::new_v4().to_string(),
            WsMessageType::Event,
            serde_json::json!({
                "event": self.event,
                "args": self.args,
            }),
        )
    }
}

/// Anything the connection's writer task sends to the client.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// A room event emitted through the registry.
    Event(OutboundEvent),
    /// A reply to a client command.
    Reply(WsMessage),
}

impl Outbound {
    /// Serializes the frame to JSON text.
    #[must_use]
    pub fn into_json(self) -> String {
        match self {
            Self::Event(event) => event.into_message().to_json(),
            Self::Reply(message) => message.to_json(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_emit_command_with_defaults() {
        let payload = serde_json::json!({
            "command": "emit",
            "room": "lobby",
            "event": "chat",
        });
        let Ok(command) = serde_json::from_value::<WsCommand>(payload) else {
            panic!("emit should parse");
        };
        assert_eq!(
            command,
            WsCommand::Emit {
                room: "lobby".to_string(),
                event: "chat".to_string(),
                args: Vec::new(),
                include_self: false,
            }
        );
    }

    #[test]
    fn parses_envelope_without_timestamp() {
        let text = r#"{"id":"1","type":"command","payload":{"command":"rooms"}}"#;
        let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
            panic!("envelope should parse");
        };
        assert_eq!(msg.msg_type, WsMessageType::Command);
        assert!(matches!(
            serde_json::from_value::<WsCommand>(msg.payload),
            Ok(WsCommand::Rooms)
        ));
    }

    #[test]
    fn event_frame_shape() {
        let frame = Outbound::Event(OutboundEvent {
            event: "chat".to_string(),
            args: vec![serde_json::json!("hi")],
        });
        let Ok(value) = serde_json::from_str::<Value>(&frame.into_json()) else {
            panic!("frame should be JSON");
        };
        assert_eq!(value.get("type"), Some(&serde_json::json!("event")));
        assert_eq!(
            value.pointer("/payload/event"),
            Some(&serde_json::json!("chat"))
        );
        assert_eq!(
            value.pointer("/payload/args/0"),
            Some(&serde_json::json!("hi"))
        );
    }
}
