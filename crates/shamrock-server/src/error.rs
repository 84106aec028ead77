//! Error types for the HTTP layer.
//!
//! [`ApiError`] maps every failure onto a status code and a JSON body of
//! the form `{"error": "...", "status": 400}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shamrock_core::CoreError;
use tracing::error;

/// Errors returned by the API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A session operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// A request parameter was malformed.
    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Status code for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidUuid(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Core(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            Self::Core(e) if e.is_conflict() => StatusCode::CONFLICT,
            Self::Core(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Core(CoreError::Store(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
