//! ObjectStore trait definition
//!
//! This trait defines the interface for the remote object store. It keeps the
//! engine decoupled from the specific S3 SDK implementation and lets the
//! relocation tests run against an in-memory store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata for a stored object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size: i64,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// Content type, when the store reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl ObjectMeta {
    /// Create metadata for an object of known size
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
            content_type: None,
            etag: None,
        }
    }
}

/// Parameters for one page request against the store
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    /// Key prefix to list under
    pub prefix: String,

    /// Delimiter for depth-one grouping (usually "/"); `None` recurses
    pub delimiter: Option<String>,

    /// Continuation token from the previous page
    pub continuation_token: Option<String>,

    /// Maximum number of keys for this page (store default when `None`)
    pub max_keys: Option<i32>,
}

/// One page of a prefix listing
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    /// Sub-prefixes, present only when a delimiter was applied
    pub prefixes: Vec<String>,

    /// Concrete objects
    pub objects: Vec<ObjectMeta>,

    /// Token for the next page, `None` when exhausted
    pub next_token: Option<String>,
}

/// Interface to the remote flat key-value object store
///
/// Implemented by the S3 adapter and by the in-memory store the engine tests
/// use. All keys are bucket-relative; the implementation is bound to one
/// bucket for the lifetime of one request.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether an object exists at exactly this key
    async fn object_exists(&self, key: &str) -> Result<bool>;

    /// Fetch object metadata; fails with `Error::NotFound` when absent
    async fn head_object(&self, key: &str) -> Result<ObjectMeta>;

    /// Fetch one page of keys under a prefix
    async fn list_objects(&self, request: ListRequest) -> Result<ObjectPage>;

    /// Server-side copy within the bucket
    async fn copy_object(&self, source_key: &str, target_key: &str) -> Result<()>;

    /// Delete a single object
    async fn delete_object(&self, key: &str) -> Result<()>;

    /// Delete a batch of objects, returning the keys actually deleted
    async fn delete_objects(&self, keys: Vec<String>) -> Result<Vec<String>>;

    /// Read the full object body
    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;

    /// Write an object body
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<ObjectMeta>;

    /// Presigned GET URL valid for `expires_secs` seconds
    async fn presign_get(&self, key: &str, expires_secs: u64) -> Result<String>;
}
