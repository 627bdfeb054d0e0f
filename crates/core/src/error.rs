//! Error types for pail-core
//!
//! Two layers: `Error` covers storage and infrastructure failures, while
//! `ValidationError` covers batch preflight rejection. A rejected batch has
//! performed no mutations; per-pair execution failures are reported in the
//! batch outcome instead and never surface through these types.

use thiserror::Error;

/// Result type alias for pail-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Storage and infrastructure errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed object key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error (bad credentials)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The store refused the operation for this principal
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Object or bucket not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

/// Reasons a batch is rejected before any operation runs.
///
/// The display strings are the wire contract of the batch endpoints and must
/// stay stable.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Source and target key lists differ in length
    #[error("not equal length")]
    LengthMismatch,

    /// Directory-shaped source paired with a file-shaped target
    #[error("try to copy dir to file")]
    DirToFile,

    /// File-shaped source paired with a directory-shaped target
    #[error("source is file but target is dir")]
    FileToDir,

    /// A plain source key has no object behind it
    #[error("source not exist: {0}")]
    SourceNotFound(String),

    /// Resolved batch exceeds the key-count cap
    #[error("too many file")]
    TooManyFiles,

    /// Resolved batch exceeds the aggregate size cap
    #[error("files too large")]
    FilesTooLarge,

    /// Two pairs resolved to the same target key
    #[error("duplicated target key")]
    DuplicatedTarget,

    /// A key appears as both a source and a target in one batch
    #[error("source overlaps target")]
    SourceOverlapsTarget,

    /// Target already holds an object and overwrite was not allowed
    #[error("will overwrite {0}")]
    WouldOverwrite(String),

    /// Storage communication failed while validating; nothing was mutated
    #[error("storage operation failed: {0}")]
    Storage(#[from] Error),
}
