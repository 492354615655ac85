//! Room handlers: list, inspect, and broadcast.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BroadcastRequest, BroadcastResponse, PaginationParams, RoomDetailResponse, RoomListResponse,
    RoomSummaryDto,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /rooms` — List rooms with member counts.
///
/// # Errors
///
/// Returns [`GatewayError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "List rooms",
    description = "Returns a paginated list of every room that currently has members, sorted by name.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated room list", body = RoomListResponse),
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let summaries: Vec<RoomSummaryDto> = state
        .room_service
        .list_rooms()
        .await
        .into_iter()
        .map(RoomSummaryDto::from)
        .collect();
    let (data, pagination) = params.paginate(summaries);

    Ok(Json(RoomListResponse { data, pagination }))
}

/// `GET /rooms/{room}` — Get room members.
///
/// # Errors
///
/// Returns [`GatewayError::RoomNotFound`] if the room has no members.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room}",
    tag = "Rooms",
    summary = "Get room members",
    description = "Returns the socket ids currently in the room.",
    params(
        ("room" = String, Path, description = "Room name"),
    ),
    responses(
        (status = 200, description = "Room members", body = RoomDetailResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let members: Vec<String> = state
        .room_service
        .members(&room)
        .await?
        .into_iter()
        .map(|id| id.to_string())
        .collect();

    Ok(Json(RoomDetailResponse {
        count: members.len(),
        room,
        members,
    }))
}

/// `POST /rooms/{room}/broadcast` — Emit an event to every member.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on an invalid room or event
/// name.
#[utoipa::path(
    post,
    path = "/api/v1/rooms/{room}/broadcast",
    tag = "Rooms",
    summary = "Broadcast to a room",
    description = "Emits the event to every member of the room. Sending to an empty room delivers nothing and still succeeds.",
    params(
        ("room" = String, Path, description = "Room name"),
    ),
    request_body = BroadcastRequest,
    responses(
        (status = 202, description = "Event handed to room members", body = BroadcastResponse),
        (status = 400, description = "Invalid room or event name", body = ErrorResponse),
    )
)]
pub async fn broadcast(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(req): Json<BroadcastRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let report = state
        .room_service
        .emit(None, &room, &req.event, &req.args)
        .await?;

    let response = BroadcastResponse {
        room,
        event: req.event,
        delivered: report.delivered,
        failed: report.failed,
    };

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Room routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms/{room}", get(get_room))
        .route("/rooms/{room}/broadcast", post(broadcast))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::RoomRegistry;
    use crate::domain::socket::testing::RecordingSocket;
    use crate::service::RoomService;

    fn state() -> AppState {
        AppState {
            room_service: Arc::new(RoomService::new(Arc::new(RoomRegistry::new()), 64)),
            socket_buffer_capacity: 8,
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(value) = serde_json::from_slice(&bytes) else {
            panic!("body is not JSON");
        };
        value
    }

    #[tokio::test]
    async fn missing_room_is_404() {
        let app = routes().with_state(state());
        let Ok(request) = Request::get("/rooms/ghost").body(Body::empty()) else {
            panic!("request build failed");
        };
        let Ok(response) = app.oneshot(request).await else {
            panic!("router failed");
        };
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lists_and_broadcasts() {
        let state = state();
        let a = RecordingSocket::new("a");
        let _ = state.room_service.join("lobby", a.handle()).await;
        let app = routes().with_state(state);

        let Ok(request) = Request::get("/rooms").body(Body::empty()) else {
            panic!("request build failed");
        };
        let Ok(response) = app.clone().oneshot(request).await else {
            panic!("router failed");
        };
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed.pointer("/data/0/room"), Some(&serde_json::json!("lobby")));
        assert_eq!(listed.pointer("/pagination/total"), Some(&serde_json::json!(1)));

        let Ok(request) = Request::post("/rooms/lobby/broadcast")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"event":"notice","args":[1]}"#))
        else {
            panic!("request build failed");
        };
        let Ok(response) = app.oneshot(request).await else {
            panic!("router failed");
        };
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let sent = body_json(response).await;
        assert_eq!(sent.get("delivered"), Some(&serde_json::json!(1)));
        assert_eq!(a.received().len(), 1);
    }
}
