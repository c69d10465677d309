//! Error types for ptcheck Core

use crate::primitive::{PrimitiveId, PrimitiveRef};
use thiserror::Error;

/// Result type alias using ptcheck's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to obtain the full content of a primitive from its source.
///
/// These are infrastructure failures, not structural defects: the relation
/// being checked cannot be reasoned about without the missing data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Primitive not found: {0}")]
    NotFound(PrimitiveRef),

    #[error("Primitive is incomplete: {0}")]
    Incomplete(PrimitiveRef),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// ptcheck error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Resolution failed: {0}")]
    Resolution(#[from] FetchError),

    #[error("Not a relation: {0}")]
    NotARelation(PrimitiveRef),

    #[error("Validation of relation {0} was cancelled")]
    Cancelled(PrimitiveId),

    #[error("Unknown placement rule: {0}")]
    UnknownRule(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
