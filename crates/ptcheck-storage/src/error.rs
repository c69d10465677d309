//! Storage error types

use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid id {id} for {kind}")]
    InvalidId { kind: String, id: i64 },

    #[error("Unknown member type '{0}'")]
    UnknownMemberType(String),

    #[error("Lock error: {0}")]
    Lock(String),
}
