//! OpenAPI document for the REST surface.
//!
//! The raw document is served at `/api-docs/openapi.json`. With the
//! `swagger-ui` feature the interactive UI is mounted at `/swagger-ui`.

use axum::Router;
use utoipa::OpenApi;

use super::dto::{
    BroadcastRequest, BroadcastResponse, PaginationMeta, RoomDetailResponse, RoomListResponse,
    RoomSummaryDto,
};
use super::handlers::{room, system};
use crate::app_state::AppState;
use crate::domain::SendReport;
use crate::error::{ErrorBody, ErrorResponse};

/// Path of the served OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Generated OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "roomcast",
        description = "Room-based broadcast registry and WebSocket gateway"
    ),
    paths(
        system::health_handler,
        room::list_rooms,
        room::get_room,
        room::broadcast,
    ),
    components(schemas(
        system::HealthResponse,
        RoomSummaryDto,
        RoomListResponse,
        RoomDetailResponse,
        BroadcastRequest,
        BroadcastResponse,
        PaginationMeta,
        SendReport,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Health and service metadata"),
        (name = "Rooms", description = "Room membership and broadcast"),
    )
)]
pub struct ApiDoc;

/// Routes serving the OpenAPI document (and Swagger UI when enabled).
///
/// Swagger UI serves the document itself, so the plain route is only added
/// when the UI is compiled out.
pub fn routes() -> Router<AppState> {
    #[cfg(feature = "swagger-ui")]
    {
        Router::new().merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()),
        )
    }

    #[cfg(not(feature = "swagger-ui"))]
    {
        use axum::Json;
        use axum::routing::get;

        Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
    }
}
