use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use treehouse_core::{GatewayError, ValidationError};

/// API error type mapped to the JSON error envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// The store failed; message is the gateway's user-safe static text.
    #[error("{0}")]
    Unavailable(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::DocumentNotFound(id) => {
                ApiError::NotFound(format!("document {id} not found"))
            }
            GatewayError::Unavailable(msg) => ApiError::Unavailable(msg),
            GatewayError::Invalid(err) => match err {
                ValidationError::Cycle { .. } | ValidationError::SelfParent(_) => {
                    ApiError::Conflict(err.to_string())
                }
                ValidationError::UnknownParent(_) | ValidationError::ParentOutsideWorkspace(_) => {
                    ApiError::BadRequest(err.to_string())
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Unavailable(msg) => {
                // The cause was already logged at the gateway boundary.
                (StatusCode::INTERNAL_SERVER_ERROR, "internalError", msg.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
