//! Upload endpoint
//!
//! Multipart form with a `path` field (the target directory) and a `file`
//! field. The object key is the directory path plus the uploaded filename.

use axum::extract::Multipart;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use pail_core::ObjectStore as _;

use crate::auth;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub key: String,
}

pub async fn upload_file(
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut path: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("path") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("unreadable path field: {e}")))?;
                path = Some(value);
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::bad_request("file field needs a filename"))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("unreadable file field: {e}")))?
                    .to_vec();
                file = Some((filename, data));
            }
            _ => {}
        }
    }

    let path = path.ok_or_else(|| ApiError::bad_request("missing field: path"))?;
    if !path.ends_with('/') {
        return Err(ApiError::bad_request("path must end with /"));
    }
    let (filename, data) = file.ok_or_else(|| ApiError::bad_request("missing field: file"))?;

    let object_key = format!("{path}{filename}");
    let content_type: Option<String> = mime_guess::from_path(&filename)
        .first()
        .map(|m| m.essence_str().to_string());

    let client = auth::connect(&headers).await?;
    client
        .put_object(&object_key, data, content_type.as_deref())
        .await?;

    Ok(Json(UploadResponse {
        status: "success",
        key: object_key,
    }))
}
