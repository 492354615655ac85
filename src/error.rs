//! Error types for the room registry and the gateway.
//!
//! [`BroadcastError`] is returned by [`crate::domain::BroadcastAdaptor`]
//! implementations. [`GatewayError`] is the central error type for the
//! HTTP and WebSocket surface; each variant maps to a specific HTTP status
//! code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Failure of a broadcast adaptor operation.
///
/// Absence (unknown room, non-member socket) is never reported through
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BroadcastError {
    /// The socket cannot be addressed (e.g. its id is empty).
    #[error("invalid socket: {0}")]
    InvalidSocket(String),

    /// The adaptor's backing transport could not be reached.
    #[error("broadcast backend unavailable: {0}")]
    Unavailable(String),
}

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: room name must not be empty",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 500 / 503                 |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Room with the given name has no members.
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Error propagated from the broadcast adaptor.
    #[error("broadcast error: {0}")]
    Broadcast(#[from] BroadcastError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Broadcast(BroadcastError::InvalidSocket(_)) => 1002,
            Self::RoomNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::Broadcast(BroadcastError::Unavailable(_)) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::Broadcast(BroadcastError::InvalidSocket(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::RoomNotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Broadcast(BroadcastError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Builds the JSON error body for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = axum::Json(self.to_body()).into_response();
        *response.status_mut() = status;
        response
    }
}
