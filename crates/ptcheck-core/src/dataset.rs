//! In-memory collection of primitives

use crate::error::FetchError;
use crate::primitive::{Node, OsmPrimitive, Primitive, PrimitiveId, PrimitiveKind, PrimitiveRef, Relation, Way};
use std::collections::HashMap;
use std::sync::Arc;

/// Primitives downloaded from a source, keyed by kind and id
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    nodes: HashMap<PrimitiveId, Arc<Node>>,
    ways: HashMap<PrimitiveId, Arc<Way>>,
    relations: HashMap<PrimitiveId, Arc<Relation>>,
}

/// Insert `value`, never replacing a complete primitive with an incomplete one.
/// Returns true when the map changed.
fn merge<T: OsmPrimitive>(map: &mut HashMap<PrimitiveId, Arc<T>>, value: Arc<T>) -> bool {
    if let Some(existing) = map.get(&value.id()) {
        if !existing.is_incomplete() && value.is_incomplete() {
            return false;
        }
    }
    map.insert(value.id(), value);
    true
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: impl Into<Arc<Node>>) -> bool {
        merge(&mut self.nodes, node.into())
    }

    pub fn add_way(&mut self, way: impl Into<Arc<Way>>) -> bool {
        merge(&mut self.ways, way.into())
    }

    pub fn add_relation(&mut self, relation: impl Into<Arc<Relation>>) -> bool {
        merge(&mut self.relations, relation.into())
    }

    pub fn add(&mut self, primitive: Primitive) -> bool {
        match primitive {
            Primitive::Node(n) => self.add_node(n),
            Primitive::Way(w) => self.add_way(w),
            Primitive::Relation(r) => self.add_relation(r),
        }
    }

    pub fn with(mut self, primitive: impl Into<Primitive>) -> Self {
        self.add(primitive.into());
        self
    }

    pub fn node(&self, id: PrimitiveId) -> Option<&Arc<Node>> {
        self.nodes.get(&id)
    }

    pub fn way(&self, id: PrimitiveId) -> Option<&Arc<Way>> {
        self.ways.get(&id)
    }

    pub fn relation(&self, id: PrimitiveId) -> Option<&Arc<Relation>> {
        self.relations.get(&id)
    }

    pub fn get(&self, reference: PrimitiveRef) -> Option<Primitive> {
        match reference.kind {
            PrimitiveKind::Node => self.node(reference.id).cloned().map(Primitive::Node),
            PrimitiveKind::Way => self.way(reference.id).cloned().map(Primitive::Way),
            PrimitiveKind::Relation => self
                .relation(reference.id)
                .cloned()
                .map(Primitive::Relation),
        }
    }

    /// Look up a complete primitive
    pub fn resolve_local(&self, reference: PrimitiveRef) -> Result<Primitive, FetchError> {
        match self.get(reference) {
            Some(p) if p.is_incomplete() => Err(FetchError::Incomplete(reference)),
            Some(p) => Ok(p),
            None => Err(FetchError::NotFound(reference)),
        }
    }

    /// Relations tagged `type=route`, ordered by id
    pub fn route_relations(&self) -> Vec<Arc<Relation>> {
        let mut routes: Vec<Arc<Relation>> = self
            .relations
            .values()
            .filter(|r| r.is_route())
            .cloned()
            .collect();
        routes.sort_by_key(|r| r.id());
        routes
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.ways.len() + self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge every primitive of `other` into this set
    pub fn extend(&mut self, other: DataSet) {
        for node in other.nodes.into_values() {
            self.add_node(node);
        }
        for way in other.ways.into_values() {
            self.add_way(way);
        }
        for relation in other.relations.into_values() {
            self.add_relation(relation);
        }
    }
}
