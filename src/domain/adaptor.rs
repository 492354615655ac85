//! The broadcast adaptor contract.
//!
//! Everything above the domain layer talks to rooms through
//! [`BroadcastAdaptor`], so the in-memory [`super::RoomRegistry`] can be
//! replaced by a distributed implementation (e.g. one backed by a pub/sub
//! bus) without touching callers.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::{Socket, SocketHandle, SocketId};
use crate::error::BroadcastError;

/// Outcome of a room-wide send.
///
/// A send always succeeds once every member has been attempted; the
/// counts let callers decide what to do about individual failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SendReport {
    /// Members the event was handed off to.
    pub delivered: usize,
    /// Members whose emit failed.
    pub failed: usize,
}

/// Room membership and fan-out.
///
/// All methods are safe to call concurrently from any task.
///
/// Absence is never an error: unknown rooms read as empty and leaving a
/// room you are not in is a no-op. The mutating methods return a
/// [`Result`] so implementations that reach across a network can surface
/// transport failures.
#[async_trait]
pub trait BroadcastAdaptor: Send + Sync + std::fmt::Debug {
    /// Rooms containing `socket`, or every tracked room when `None`.
    ///
    /// No ordering is defined.
    async fn rooms(&self, socket: Option<&dyn Socket>) -> Vec<String>;

    /// Whether `socket` is a member of `room`, or whether the room exists
    /// at all when `None`.
    async fn has(&self, room: &str, socket: Option<&dyn Socket>) -> bool;

    /// Adds `socket` to `room`, creating the room if needed.
    ///
    /// Joining twice with the same id replaces the stored handle.
    ///
    /// # Errors
    ///
    /// Returns [`BroadcastError::InvalidSocket`] if the socket id is empty.
    async fn join(&self, room: &str, socket: SocketHandle) -> Result<(), BroadcastError>;

    /// Removes `socket` from `room`, deleting the room when it empties.
    ///
    /// # Errors
    ///
    /// Returns [`BroadcastError::InvalidSocket`] if the socket id is empty.
    async fn leave(&self, room: &str, socket: &dyn Socket) -> Result<(), BroadcastError>;

    /// Owned snapshot of the members of `room`.
    async fn clients(&self, room: &str) -> HashMap<SocketId, SocketHandle>;

    /// Emits `event` with `args` to every member of `room` except `ignore`.
    ///
    /// # Errors
    ///
    /// The in-memory registry never fails; distributed implementations may
    /// return [`BroadcastError::Unavailable`].
    async fn send(
        &self,
        ignore: Option<&dyn Socket>,
        room: &str,
        event: &str,
        args: &[Value],
    ) -> Result<SendReport, BroadcastError>;

    /// Number of members in `room` (0 when absent).
    async fn number_in_room(&self, room: &str) -> usize {
        self.clients(room).await.len()
    }

    /// Number of rooms currently tracked.
    async fn number_of_rooms(&self) -> usize {
        self.rooms(None).await.len()
    }

    /// Names of every room currently tracked.
    async fn list_of_rooms(&self) -> Vec<String> {
        self.rooms(None).await
    }
}
