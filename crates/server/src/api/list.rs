//! List endpoint
//!
//! Depth-one listing of a directory path, directories first.

use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use pail_core::{list_dir, DirListing};

use super::ensure_dir_path;
use crate::auth;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListBody {
    /// Directory path to list; empty string is the bucket root
    #[serde(default)]
    pub path: String,

    /// Cap on returned entries, avoids freezing the UI on huge directories
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Only return directories
    #[serde(default)]
    pub dir: bool,
}

fn default_limit() -> i64 {
    100
}

pub async fn list_files(
    headers: HeaderMap,
    Json(body): Json<ListBody>,
) -> Result<Json<DirListing>, ApiError> {
    ensure_dir_path(&body.path)?;

    let client = auth::connect(&headers).await?;
    let listing = list_dir(&client, &body.path, body.limit, body.dir).await?;

    Ok(Json(listing))
}
