//! Per-request bucket credentials
//!
//! Every request carries its own connection details; no client or session
//! state is shared between requests. The struct is built from request headers
//! at the HTTP boundary and passed by reference into the storage adapter.

/// Connection details for one request's bucket
#[derive(Clone)]
pub struct BucketCredentials {
    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Endpoint URL of the S3-compatible service
    pub endpoint: String,

    /// Bucket name
    pub bucket: String,

    /// Region sent to the SDK
    pub region: String,

    /// Use path-style addressing (required by most self-hosted backends)
    pub path_style: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl BucketCredentials {
    /// Create credentials with the default region and path-style addressing
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            region: default_region(),
            path_style: true,
        }
    }
}

// Manual Debug so the secret never lands in logs.
impl std::fmt::Debug for BucketCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("path_style", &self.path_style)
            .finish()
    }
}
