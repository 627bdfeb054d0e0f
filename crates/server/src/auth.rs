//! Per-request credential plumbing
//!
//! Every API request carries its own backend credentials in the `key`,
//! `secret`, `endpoint` and `bucket` headers. A client is built and probed
//! per request; nothing is cached across requests.

use axum::http::HeaderMap;

use pail_core::BucketCredentials;
use pail_s3::S3Client;

use crate::error::ApiError;

fn required_header(headers: &HeaderMap, name: &str) -> Result<String, ApiError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request(format!("missing header: {name}")))
}

/// Read the bucket credentials this request carried
pub fn credentials_from_headers(headers: &HeaderMap) -> Result<BucketCredentials, ApiError> {
    Ok(BucketCredentials::new(
        required_header(headers, "key")?,
        required_header(headers, "secret")?,
        required_header(headers, "endpoint")?,
        required_header(headers, "bucket")?,
    ))
}

/// Build and probe a client for this request's credentials.
///
/// The probe surfaces bad credentials (401), denied access (403) and a
/// missing bucket (404) before any batch work starts.
pub async fn connect(headers: &HeaderMap) -> Result<S3Client, ApiError> {
    let credentials = credentials_from_headers(headers)?;
    let client = S3Client::connect(&credentials).await?;
    client.verify_access().await?;
    Ok(client)
}
