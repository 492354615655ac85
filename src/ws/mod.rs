//! WebSocket layer: connection handling, message routing, and the
//! WebSocket-backed socket.
//!
//! The WebSocket endpoint at `/ws` lets clients join and leave rooms and
//! emit room-scoped events to each other.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod socket;

pub use socket::WsSocket;
