//! # API error mapping
//!
//! Wraps the domain `AppError` so it can carry an HTTP status. Internal
//! failures are logged with detail but surfaced generically.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domains::error::AppError;

pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::NotFound(..) => (StatusCode::NOT_FOUND, self.0.to_string()),
            AppError::Forbidden(..) => (StatusCode::FORBIDDEN, self.0.to_string()),
            AppError::Conflict(..) => (StatusCode::CONFLICT, self.0.to_string()),
            AppError::Validation(..) => (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string()),
            AppError::Internal(detail) => {
                tracing::error!(%detail, "internal error while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal service error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
