//! In-memory primitive source

use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use ptcheck_core::{DataSet, FetchError, Primitive, PrimitiveRef, PrimitiveSource, Relation};
use std::sync::{Arc, RwLock};

/// Shared, growable data set
///
/// Primitives handed out are `Arc` snapshots: later inserts never change a
/// primitive a running check already holds.
pub struct MemorySource {
    data: RwLock<DataSet>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::from_dataset(DataSet::new())
    }

    pub fn from_dataset(dataset: DataSet) -> Self {
        Self {
            data: RwLock::new(dataset),
        }
    }

    /// Add a primitive. Complete entries are never replaced by incomplete ones.
    pub fn insert(&self, primitive: impl Into<Primitive>) -> StorageResult<bool> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(data.add(primitive.into()))
    }

    /// Merge a whole data set, e.g. a second loaded document
    pub fn extend(&self, other: DataSet) -> StorageResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        data.extend(other);
        Ok(())
    }

    /// Route relations currently held, ordered by id
    pub fn route_relations(&self) -> StorageResult<Vec<Arc<Relation>>> {
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(data.route_relations())
    }

    /// Number of primitives held, 0 when the lock is poisoned
    pub fn len(&self) -> usize {
        match self.data.read() {
            Ok(data) => data.len(),
            Err(e) => {
                tracing::warn!("Lock error: {}", e);
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DataSet> for MemorySource {
    fn from(dataset: DataSet) -> Self {
        Self::from_dataset(dataset)
    }
}

#[async_trait]
impl PrimitiveSource for MemorySource {
    async fn resolve(&self, reference: PrimitiveRef) -> Result<Primitive, FetchError> {
        let data = self
            .data
            .read()
            .map_err(|e| FetchError::Unavailable(format!("Lock error: {}", e)))?;
        data.resolve_local(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptcheck_core::{
        validate_batch, BatchOptions, CheckEngine, Node, OsmPrimitive, PrimitiveId, Way,
    };

    fn route() -> Relation {
        Relation::with_version(100, 1)
            .with_tag("type", "route")
            .with_tag("route", "bus")
            .with_member("", PrimitiveRef::way(1))
            .with_member("", PrimitiveRef::way(2))
    }

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemorySource::new();
        assert!(source.is_empty());

        source
            .insert(Way::with_version(1, 1).with_nodes([1u64, 2]))
            .unwrap();
        source.insert(Node::with_version(1, 1)).unwrap();
        assert_eq!(source.len(), 2);

        let way = source.resolve(PrimitiveRef::way(1)).await.unwrap();
        assert!(way.is_way());
        assert_eq!(
            source.resolve(PrimitiveRef::way(9)).await,
            Err(FetchError::NotFound(PrimitiveRef::way(9)))
        );
    }

    #[tokio::test]
    async fn test_incomplete_is_upgraded_not_downgraded() {
        let source = MemorySource::new();
        source.insert(Way::new(1)).unwrap();
        assert_eq!(
            source.resolve(PrimitiveRef::way(1)).await,
            Err(FetchError::Incomplete(PrimitiveRef::way(1)))
        );

        assert!(source
            .insert(Way::with_version(1, 2).with_nodes([1u64, 2]))
            .unwrap());
        assert!(!source.insert(Way::new(1)).unwrap());

        let way = source.resolve(PrimitiveRef::way(1)).await.unwrap();
        assert_eq!(way.data().version, 2);
    }

    #[tokio::test]
    async fn test_validate_from_memory_source() {
        let source = MemorySource::from_dataset(
            DataSet::new()
                .with(Way::with_version(1, 1).with_nodes([1u64, 2]))
                .with(Way::with_version(2, 1).with_nodes([5u64, 6]))
                .with(route()),
        );

        let routes = source.route_relations().unwrap();
        assert_eq!(routes.len(), 1);

        let mut engine = CheckEngine::new();
        let report = engine.validate(&routes[0], &source).await.unwrap();
        assert!(!report.passed);
        assert_eq!(report.errors().count(), 1);
    }

    #[tokio::test]
    async fn test_batch_over_shared_source() {
        let source = Arc::new(MemorySource::new());
        source
            .extend(
                DataSet::new()
                    .with(Way::with_version(1, 1).with_nodes([1u64, 2]))
                    .with(Way::with_version(2, 1).with_nodes([2u64, 3]))
                    .with(route()),
            )
            .unwrap();

        let results = validate_batch(
            vec![PrimitiveId(100)],
            Arc::clone(&source),
            BatchOptions::default(),
        )
        .await;
        assert!(results[0].1.as_ref().unwrap().passed);
        assert_eq!(routes_id(&source), vec![PrimitiveId(100)]);
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_unavailable() {
        let source = Arc::new(MemorySource::new());
        source.insert(Node::with_version(1, 1)).unwrap();

        let poisoner = Arc::clone(&source);
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.data.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(joined.is_err());

        assert_eq!(source.len(), 0);
        assert!(matches!(
            source.resolve(PrimitiveRef::node(1)).await,
            Err(FetchError::Unavailable(_))
        ));
        assert!(matches!(
            source.insert(Node::with_version(2, 1)),
            Err(StorageError::Lock(_))
        ));
    }

    fn routes_id(source: &MemorySource) -> Vec<PrimitiveId> {
        source
            .route_relations()
            .unwrap()
            .iter()
            .map(|r| r.id())
            .collect()
    }
}
