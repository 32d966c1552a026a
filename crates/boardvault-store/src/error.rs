//! Error types for store operations.
//!
//! This is the taxonomy the UI layer consumes: it decides between a
//! password prompt, an inline validation message and a non-fatal retry
//! warning without ever inspecting storage internals.

use std::path::PathBuf;
use thiserror::Error;

use boardvault_crypto::CryptoError;
use boardvault_models::ModelError;

/// Errors that can occur during store and registry operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read from the file system.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to the file system.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory.
    #[error("failed to create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A registry entry or document does not exist.
    #[error("{kind} not found: {name}")]
    NotFound { kind: String, name: String },

    /// A name-based identity would be duplicated.
    #[error("a {kind} named '{name}' already exists")]
    DuplicateName { kind: String, name: String },

    /// A plaintext document is structurally invalid.
    ///
    /// The source error names the offending field and position.
    #[error("malformed document {path}: {source}")]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize a document or the registry index.
    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The document is encrypted and no password was supplied.
    #[error("document {path} is encrypted and requires a password")]
    PasswordRequired { path: PathBuf },

    /// Wrong password or corrupt ciphertext (deliberately conflated).
    #[error(transparent)]
    DecryptionFailed(#[from] CryptoError),

    /// A provided name or value is unusable.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::DuplicateName { kind, name } => Self::DuplicateName {
                kind: kind.to_string(),
                name,
            },
            ModelError::NotFound { kind, name } => Self::NotFound {
                kind: kind.to_string(),
                name,
            },
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
