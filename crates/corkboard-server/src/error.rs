use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use corkboard_core::CorkboardError;
use serde_json::json;

/// HTTP-facing wrapper for the library error. Non-2xx responses always carry
/// a `{message}` body.
#[derive(Debug)]
pub struct ApiError(pub CorkboardError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<CorkboardError> for ApiError {
    fn from(err: CorkboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CorkboardError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CorkboardError::Domain(_) => StatusCode::BAD_REQUEST,
            CorkboardError::NotFound(_) => StatusCode::NOT_FOUND,
            CorkboardError::Forbidden(_) => StatusCode::FORBIDDEN,
            CorkboardError::Conflict(_) => StatusCode::CONFLICT,
            CorkboardError::Io(_)
            | CorkboardError::Serialization(_)
            | CorkboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "message": self.0.to_string() }))).into_response()
    }
}
