//! Share and preview endpoints
//!
//! Both are thin pass-throughs to the storage client: share returns a
//! presigned GET URL, preview streams the object body back with a sniffed
//! content type.

use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use pail_core::ObjectStore as _;

use crate::auth;
use crate::error::ApiError;

/// Default share-link lifetime: 7 days
const DEFAULT_EXPIRE_SECS: u64 = 604_800;

#[derive(Debug, Deserialize)]
pub struct ShareBody {
    pub file_key: String,

    /// Link lifetime in seconds
    #[serde(default = "default_expire")]
    pub expire: u64,
}

fn default_expire() -> u64 {
    DEFAULT_EXPIRE_SECS
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub share_url: String,
}

pub async fn share_file(
    headers: HeaderMap,
    Json(body): Json<ShareBody>,
) -> Result<Json<ShareResponse>, ApiError> {
    let client = auth::connect(&headers).await?;
    let share_url = client.presign_get(&body.file_key, body.expire).await?;

    Ok(Json(ShareResponse { share_url }))
}

#[derive(Debug, Deserialize)]
pub struct PreviewBody {
    pub file_key: String,
}

pub async fn preview_file(
    headers: HeaderMap,
    Json(body): Json<PreviewBody>,
) -> Result<Response, ApiError> {
    let client = auth::connect(&headers).await?;
    let data = client.get_object(&body.file_key).await?;

    let content_type = mime_guess::from_path(&body.file_key).first_or_octet_stream();

    Ok((
        [(header::CONTENT_TYPE, content_type.essence_str().to_string())],
        data,
    )
        .into_response())
}
