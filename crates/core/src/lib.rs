//! pail-core: Core library for the pail bucket file manager
//!
//! This crate provides the storage-facing core of pail, including:
//! - Key-string algebra for directory-shaped keys
//! - Prefix expansion with batch size caps
//! - Batch relocation validation and concurrent execution
//! - Depth-one directory listings
//! - The ObjectStore trait and per-request credentials
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other backends.

pub mod batch;
pub mod config;
pub mod credentials;
pub mod error;
pub mod expand;
pub mod key;
pub mod listing;
pub mod traits;

pub use batch::{
    copy_batch, execute_batch, move_batch, rename, validate_pairs, validate_sources,
    BatchOutcome, FailedPair, RelocationMode, RelocationPair,
};
pub use config::{Config, ConfigManager, ServerConfig};
pub use credentials::BucketCredentials;
pub use error::{Error, Result, ValidationError};
pub use expand::{expand_prefix, BatchBudget, MAX_BATCH_BYTES, MAX_BATCH_KEYS};
pub use listing::{list_dir, DirListing, ListedEntry};
pub use traits::{ListRequest, ObjectMeta, ObjectPage, ObjectStore};
