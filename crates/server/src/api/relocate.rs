//! Copy, move and rename endpoints
//!
//! All three feed the batch relocation engine. Copy and move take a list of
//! source keys plus a target directory (optionally renaming); rename is a
//! single-pair move that keeps the parent directory.

use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use pail_core::{copy_batch, move_batch, rename};

use super::{batch_response, ensure_dir_path, ensure_rename};
use crate::auth;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RelocateBody {
    pub src_keys: Vec<String>,

    /// Destination directory; empty string is the bucket root
    pub target_dir: String,

    /// Rename the (single) source while relocating it
    #[serde(default)]
    pub rename: String,

    /// Allow replacing objects that already exist at a target key
    #[serde(default)]
    pub allow_overwrite: bool,
}

pub async fn copy_files(
    headers: HeaderMap,
    Json(body): Json<RelocateBody>,
) -> Result<Response, ApiError> {
    ensure_dir_path(&body.target_dir)?;
    ensure_rename(&body.rename)?;

    let client = auth::connect(&headers).await?;
    let result = copy_batch(
        &client,
        &body.src_keys,
        &body.target_dir,
        &body.rename,
        body.allow_overwrite,
    )
    .await;

    Ok(batch_response(result))
}

pub async fn move_files(
    headers: HeaderMap,
    Json(body): Json<RelocateBody>,
) -> Result<Response, ApiError> {
    ensure_dir_path(&body.target_dir)?;
    ensure_rename(&body.rename)?;

    let client = auth::connect(&headers).await?;
    let result = move_batch(
        &client,
        &body.src_keys,
        &body.target_dir,
        &body.rename,
        body.allow_overwrite,
    )
    .await;

    Ok(batch_response(result))
}

#[derive(Debug, Deserialize)]
pub struct RenameBody {
    pub file_key: String,
    pub new_name: String,
}

pub async fn rename_file(
    headers: HeaderMap,
    Json(body): Json<RenameBody>,
) -> Result<Response, ApiError> {
    if body.file_key.is_empty() {
        return Err(ApiError::bad_request("file_key must not be empty"));
    }
    if body.new_name.is_empty() || body.new_name.contains('/') {
        return Err(ApiError::bad_request(
            "new_name must be a single path component",
        ));
    }

    let client = auth::connect(&headers).await?;
    let result = rename(&client, &body.file_key, &body.new_name).await;

    Ok(batch_response(result))
}
