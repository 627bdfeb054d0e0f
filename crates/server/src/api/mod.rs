//! API endpoint handlers
//!
//! One file per endpoint group. All endpoints are POST and read the bucket
//! credentials from the request headers (see `auth`). Batch endpoints share
//! the `BatchResponse` shape, which distinguishes "did not run" (validation
//! rejected, single `err` message, 400) from "ran with some failures"
//! (`failed` list) from "fully succeeded" (`ok` with an empty list).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use pail_core::{BatchOutcome, FailedPair, ValidationError};

use crate::error::ApiError;

mod delete;
mod list;
mod relocate;
mod share;
mod upload;

/// Assemble the API router
pub fn router() -> Router {
    Router::new()
        .route("/list/", post(list::list_files))
        .route("/upload/", post(upload::upload_file))
        .route("/share/", post(share::share_file))
        .route("/preview/", post(share::preview_file))
        .route("/delete/", post(delete::delete_files))
        .route("/copy/", post(relocate::copy_files))
        .route("/move/", post(relocate::move_files))
        .route("/rename/", post(relocate::rename_file))
}

/// Response body of the batch endpoints
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    /// True only when every pair was applied
    pub ok: bool,

    /// Validation rejection message; nothing ran when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,

    /// Per-pair execution failures in submission order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedPair>,
}

impl BatchResponse {
    fn from_outcome(outcome: BatchOutcome) -> Self {
        Self {
            ok: outcome.ok(),
            err: None,
            failed: outcome.failed,
        }
    }

    fn rejected(message: String) -> Self {
        Self {
            ok: false,
            err: Some(message),
            failed: Vec::new(),
        }
    }
}

/// Turn a batch result into the wire response
pub(crate) fn batch_response(result: Result<BatchOutcome, ValidationError>) -> Response {
    match result {
        Ok(outcome) => (StatusCode::OK, Json(BatchResponse::from_outcome(outcome))).into_response(),
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(BatchResponse::rejected(err.to_string())),
        )
            .into_response(),
    }
}

/// Directory paths must be empty (bucket root) or end in `/`
pub(crate) fn ensure_dir_path(path: &str) -> Result<(), ApiError> {
    if path.is_empty() || path.ends_with('/') {
        Ok(())
    } else {
        Err(ApiError::bad_request("path must be empty or end with /"))
    }
}

/// A rename is a single path component, optionally with one trailing `/`
pub(crate) fn ensure_rename(rename: &str) -> Result<(), ApiError> {
    if rename.strip_suffix('/').unwrap_or(rename).contains('/') {
        Err(ApiError::bad_request("rename must be a single path component"))
    } else {
        Ok(())
    }
}
