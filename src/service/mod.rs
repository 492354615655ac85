//! Service layer: room orchestration on top of the broadcast adaptor.
//!
//! [`RoomService`] validates room requests, logs membership changes, and
//! cleans up after disconnected sockets.

pub mod room_service;

pub use room_service::{RoomService, RoomSummary};
