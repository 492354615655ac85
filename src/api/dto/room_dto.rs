//! Room DTOs for list, detail, and broadcast operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::service::RoomSummary;

/// Member count of one room in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomSummaryDto {
    /// Room name.
    pub room: String,
    /// Number of sockets in the room.
    pub members: usize,
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            room: summary.room,
            members: summary.members,
        }
    }
}

/// Response body for `GET /rooms`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomListResponse {
    /// Rooms on this page, sorted by name.
    pub data: Vec<RoomSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `GET /rooms/{room}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomDetailResponse {
    /// Room name.
    pub room: String,
    /// Socket ids of the members, sorted.
    pub members: Vec<String>,
    /// Number of members.
    pub count: usize,
}

/// Request body for `POST /rooms/{room}/broadcast`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BroadcastRequest {
    /// Application event name.
    pub event: String,
    /// Event arguments.
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Response body for `POST /rooms/{room}/broadcast` (202 Accepted).
#[derive(Debug, Serialize, ToSchema)]
pub struct BroadcastResponse {
    /// Target room.
    pub room: String,
    /// Event name echoed from the request.
    pub event: String,
    /// Members the event was handed to.
    pub delivered: usize,
    /// Members whose delivery failed.
    pub failed: usize,
}
