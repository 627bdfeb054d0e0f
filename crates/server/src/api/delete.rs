//! Delete endpoint
//!
//! Preflight normalizes the sources (expanding directories, confirming plain
//! keys exist) before anything is removed; a rejected request deletes
//! nothing.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use pail_core::{validate_sources, ObjectStore as _};

use crate::auth;
use crate::error::ApiError;

/// Store-side cap on keys per delete call
const DELETE_CHUNK: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct DeleteBody {
    pub src_keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl DeleteResponse {
    fn ok() -> Self {
        Self { ok: true, err: None }
    }

    fn failed(message: String) -> Self {
        Self {
            ok: false,
            err: Some(message),
        }
    }
}

pub async fn delete_files(
    headers: HeaderMap,
    Json(body): Json<DeleteBody>,
) -> Result<Response, ApiError> {
    let client = auth::connect(&headers).await?;

    let resolved = match validate_sources(&client, &body.src_keys).await {
        Ok(keys) => keys,
        Err(err) => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(DeleteResponse::failed(err.to_string())),
            )
                .into_response());
        }
    };

    for chunk in resolved.chunks(DELETE_CHUNK) {
        if let Err(e) = client.delete_objects(chunk.to_vec()).await {
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DeleteResponse::failed(e.to_string())),
            )
                .into_response());
        }
    }

    Ok(Json(DeleteResponse::ok()).into_response())
}
