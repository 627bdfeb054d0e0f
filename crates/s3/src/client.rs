//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from pail-core. A
//! client is built per request from the credentials that request carried and
//! is bound to a single bucket.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;

use pail_core::{
    BucketCredentials, Error, ListRequest, ObjectMeta, ObjectPage, ObjectStore, Result,
};

/// S3 client wrapper bound to one bucket
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Client {
    /// Build a client from one request's credentials
    pub async fn connect(credentials: &BucketCredentials) -> Result<Self> {
        let sdk_credentials = aws_credential_types::Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None, // session token
            None, // expiry
            "pail-request-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(sdk_credentials)
            .region(aws_config::Region::new(credentials.region.clone()))
            .endpoint_url(&credentials.endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(credentials.path_style)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: credentials.bucket.clone(),
        })
    }

    /// The bucket this client operates on
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    /// Cheap probe that surfaces credential and bucket problems before any
    /// batch work starts. The probed key does not need to exist; only the
    /// error class matters.
    pub async fn verify_access(&self) -> Result<()> {
        match self
            .inner
            .head_object()
            .bucket(&self.bucket)
            .key("example")
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                let err_str = e.to_string();
                if err_str.contains("NotFound") || err_str.contains("NoSuchKey") {
                    // the key is absent but the credentials and bucket are fine
                    Ok(())
                } else if err_str.contains("SignatureDoesNotMatch")
                    || err_str.contains("InvalidAccessKeyId")
                {
                    Err(Error::Auth(err_str))
                } else if err_str.contains("AccessDenied") {
                    Err(Error::AccessDenied(err_str))
                } else if err_str.contains("NoSuchBucket") {
                    Err(Error::NotFound(format!("bucket {}", self.bucket)))
                } else {
                    Err(Error::Network(err_str))
                }
            }
        }
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn object_exists(&self, key: &str) -> Result<bool> {
        match self
            .inner
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let err_str = e.to_string();
                if err_str.contains("NotFound") || err_str.contains("NoSuchKey") {
                    Ok(false)
                } else {
                    Err(Error::Network(err_str))
                }
            }
        }
    }

    async fn head_object(&self, key: &str) -> Result<ObjectMeta> {
        let response = self
            .inner
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("NotFound") || err_str.contains("NoSuchKey") {
                    Error::NotFound(key.to_string())
                } else {
                    Error::Network(err_str)
                }
            })?;

        let mut meta = ObjectMeta::new(key, response.content_length().unwrap_or(0));

        if let Some(modified) = response.last_modified() {
            meta.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
        }

        if let Some(etag) = response.e_tag() {
            meta.etag = Some(etag.trim_matches('"').to_string());
        }

        if let Some(ct) = response.content_type() {
            meta.content_type = Some(ct.to_string());
        }

        Ok(meta)
    }

    async fn list_objects(&self, request: ListRequest) -> Result<ObjectPage> {
        let mut builder = self
            .inner
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&request.prefix);

        if let Some(delimiter) = &request.delimiter {
            builder = builder.delimiter(delimiter);
        }

        if let Some(max) = request.max_keys {
            builder = builder.max_keys(max);
        }

        if let Some(token) = &request.continuation_token {
            builder = builder.continuation_token(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(|s| s.to_string()))
            .collect();

        let mut objects = Vec::new();
        for object in response.contents() {
            let key = object.key().unwrap_or_default().to_string();
            let mut meta = ObjectMeta::new(key, object.size().unwrap_or(0));

            if let Some(modified) = object.last_modified() {
                meta.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
            }

            if let Some(etag) = object.e_tag() {
                meta.etag = Some(etag.trim_matches('"').to_string());
            }

            objects.push(meta);
        }

        let next_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(|s| s.to_string())
        } else {
            None
        };

        Ok(ObjectPage {
            prefixes,
            objects,
            next_token,
        })
    }

    async fn copy_object(&self, source_key: &str, target_key: &str) -> Result<()> {
        let copy_source = format!("{}/{}", self.bucket, source_key);

        self.inner
            .copy_object()
            .copy_source(&copy_source)
            .bucket(&self.bucket)
            .key(target_key)
            .send()
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("NotFound") || err_str.contains("NoSuchKey") {
                    Error::NotFound(source_key.to_string())
                } else {
                    Error::Network(err_str)
                }
            })?;

        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(())
    }

    async fn delete_objects(&self, keys: Vec<String>) -> Result<Vec<String>> {
        use aws_sdk_s3::types::{Delete, ObjectIdentifier};

        if keys.is_empty() {
            return Ok(vec![]);
        }

        let objects: Vec<ObjectIdentifier> = keys
            .iter()
            .map(|k| {
                ObjectIdentifier::builder()
                    .key(k)
                    .build()
                    .map_err(|e| Error::General(e.to_string()))
            })
            .collect::<Result<_>>()?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| Error::General(e.to_string()))?;

        let response = self
            .inner
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let deleted: Vec<String> = response
            .deleted()
            .iter()
            .filter_map(|d| d.key().map(|k| k.to_string()))
            .collect();

        if !response.errors().is_empty() {
            let error_keys: Vec<String> = response
                .errors()
                .iter()
                .filter_map(|e| e.key().map(|k| k.to_string()))
                .collect();
            tracing::warn!("Failed to delete some objects: {:?}", error_keys);
        }

        Ok(deleted)
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("NotFound") || err_str.contains("NoSuchKey") {
                    Error::NotFound(key.to_string())
                } else {
                    Error::Network(err_str)
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<ObjectMeta> {
        let size = data.len() as i64;
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let mut builder = self
            .inner
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body);

        if let Some(ct) = content_type {
            builder = builder.content_type(ct);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let mut meta = ObjectMeta::new(key, size);
        if let Some(etag) = response.e_tag() {
            meta.etag = Some(etag.trim_matches('"').to_string());
        }
        meta.last_modified = Some(jiff::Timestamp::now());
        meta.content_type = content_type.map(|ct| ct.to_string());

        Ok(meta)
    }

    async fn presign_get(&self, key: &str, expires_secs: u64) -> Result<String> {
        let config = PresigningConfig::expires_in(Duration::from_secs(expires_secs))
            .map_err(|e| Error::Config(format!("invalid presign expiry: {e}")))?;

        let presigned = self
            .inner
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }
}
