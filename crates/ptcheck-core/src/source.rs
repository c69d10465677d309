//! Primitive source trait definition

use crate::dataset::DataSet;
use crate::error::FetchError;
use crate::primitive::{Primitive, PrimitiveRef};
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only access to the full content of primitives.
///
/// The checker never mutates what it resolves. Sources that may be written
/// to concurrently are responsible for handing out consistent snapshots.
#[async_trait]
pub trait PrimitiveSource: Send + Sync {
    /// Resolve a reference to a complete primitive
    async fn resolve(&self, reference: PrimitiveRef) -> Result<Primitive, FetchError>;
}

#[async_trait]
impl PrimitiveSource for DataSet {
    async fn resolve(&self, reference: PrimitiveRef) -> Result<Primitive, FetchError> {
        self.resolve_local(reference)
    }
}

#[async_trait]
impl<T: PrimitiveSource + ?Sized> PrimitiveSource for Arc<T> {
    async fn resolve(&self, reference: PrimitiveRef) -> Result<Primitive, FetchError> {
        (**self).resolve(reference).await
    }
}
