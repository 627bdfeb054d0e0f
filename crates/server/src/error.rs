//! API error responses
//!
//! Maps core errors onto HTTP statuses: bad credentials are 401, a refusing
//! store is 403, a missing bucket or object is 404, everything else is 500.
//! Batch validation rejections do NOT go through this type; they are part of
//! the batch response body (see `api`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// An error response with a status code and a user-facing message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// 400 with a message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 500 with a message
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<pail_core::Error> for ApiError {
    fn from(err: pail_core::Error) -> Self {
        use pail_core::Error;

        let status = match &err {
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::AccessDenied(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}
