//! Primitive types: nodes, ways and relations
//!
//! Primitives are identified by their kind and a non-negative id. Two
//! primitives of the same kind with the same id are the same primitive,
//! whether or not one of them has been fully downloaded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Identifier of a primitive. 0 means "not yet assigned".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimitiveId(pub u64);

impl PrimitiveId {
    /// Id of a primitive that has not been uploaded yet
    pub const NEW: Self = Self(0);

    pub fn is_new(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for PrimitiveId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Concrete kind of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Node,
    Way,
    Relation,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "node" | "n" => Ok(Self::Node),
            "way" | "w" => Ok(Self::Way),
            "relation" | "r" => Ok(Self::Relation),
            other => Err(format!("unknown primitive kind: {}", other)),
        }
    }
}

/// A typed reference to a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrimitiveRef {
    pub kind: PrimitiveKind,
    pub id: PrimitiveId,
}

impl PrimitiveRef {
    pub fn new(kind: PrimitiveKind, id: impl Into<PrimitiveId>) -> Self {
        Self { kind, id: id.into() }
    }

    pub fn node(id: impl Into<PrimitiveId>) -> Self {
        Self::new(PrimitiveKind::Node, id)
    }

    pub fn way(id: impl Into<PrimitiveId>) -> Self {
        Self::new(PrimitiveKind::Way, id)
    }

    pub fn relation(id: impl Into<PrimitiveId>) -> Self {
        Self::new(PrimitiveKind::Relation, id)
    }
}

impl std::fmt::Display for PrimitiveRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Attributes shared by every primitive kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimitiveData {
    pub id: PrimitiveId,

    /// Version on the server, 0 for primitives that were never downloaded
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// True when only the id is known and the content still has to be fetched
    #[serde(default)]
    pub incomplete: bool,
}

impl PrimitiveData {
    /// Data known only by id. Any assigned id starts out incomplete.
    pub fn new(id: impl Into<PrimitiveId>) -> Self {
        let id = id.into();
        Self {
            id,
            version: 0,
            tags: BTreeMap::new(),
            timestamp: None,
            incomplete: !id.is_new(),
        }
    }

    /// Fully downloaded data
    pub fn with_version(id: impl Into<PrimitiveId>, version: u32) -> Self {
        Self {
            version,
            incomplete: false,
            ..Self::new(id)
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Whether `key` is present with exactly `value`
    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }
}

/// Behaviour common to nodes, ways and relations
pub trait OsmPrimitive {
    fn data(&self) -> &PrimitiveData;

    fn kind(&self) -> PrimitiveKind;

    fn id(&self) -> PrimitiveId {
        self.data().id
    }

    fn version(&self) -> u32 {
        self.data().version
    }

    fn reference(&self) -> PrimitiveRef {
        PrimitiveRef::new(self.kind(), self.id())
    }

    fn is_incomplete(&self) -> bool {
        self.data().incomplete
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.data().get(key)
    }

    fn has_tag(&self, key: &str, value: &str) -> bool {
        self.data().has_tag(key, value)
    }
}

macro_rules! identity_by_id {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.data.id == other.data.id
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.data.id.hash(state);
            }
        }
    };
}

/// A geographic point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub data: PrimitiveData,
}

identity_by_id!(Node);

impl Node {
    /// Incomplete node known only by id
    pub fn new(id: impl Into<PrimitiveId>) -> Self {
        Self {
            data: PrimitiveData::new(id),
        }
    }

    pub fn with_version(id: impl Into<PrimitiveId>, version: u32) -> Self {
        Self {
            data: PrimitiveData::with_version(id, version),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.put(key, value);
        self
    }
}

impl OsmPrimitive for Node {
    fn data(&self) -> &PrimitiveData {
        &self.data
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Node
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.data.id.cmp(&other.data.id)
    }
}

/// An ordered chain of nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Way {
    #[serde(flatten)]
    pub data: PrimitiveData,

    #[serde(default)]
    pub nodes: Vec<PrimitiveId>,
}

identity_by_id!(Way);

impl Way {
    /// Incomplete way known only by id
    pub fn new(id: impl Into<PrimitiveId>) -> Self {
        Self {
            data: PrimitiveData::new(id),
            nodes: Vec::new(),
        }
    }

    pub fn with_version(id: impl Into<PrimitiveId>, version: u32) -> Self {
        Self {
            data: PrimitiveData::with_version(id, version),
            nodes: Vec::new(),
        }
    }

    pub fn with_nodes<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<PrimitiveId>,
    {
        self.nodes = nodes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.put(key, value);
        self
    }

    pub fn first_node(&self) -> Option<PrimitiveId> {
        self.nodes.first().copied()
    }

    pub fn last_node(&self) -> Option<PrimitiveId> {
        self.nodes.last().copied()
    }

    /// A way needs two nodes to have distinct endpoints
    pub fn is_degenerate(&self) -> bool {
        self.nodes.len() < 2
    }

    pub fn contains_node(&self, node: PrimitiveId) -> bool {
        self.nodes.contains(&node)
    }
}

impl OsmPrimitive for Way {
    fn data(&self) -> &PrimitiveData {
        &self.data
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Way
    }
}

/// One entry of a relation's ordered member list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub role: String,

    #[serde(flatten)]
    pub target: PrimitiveRef,
}

impl Member {
    pub fn new(role: impl Into<String>, target: PrimitiveRef) -> Self {
        Self {
            role: role.into(),
            target,
        }
    }
}

/// An ordered collection of tagged references to other primitives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    #[serde(flatten)]
    pub data: PrimitiveData,

    #[serde(default)]
    pub members: Vec<Member>,
}

identity_by_id!(Relation);

impl Relation {
    /// Incomplete relation known only by id
    pub fn new(id: impl Into<PrimitiveId>) -> Self {
        Self {
            data: PrimitiveData::new(id),
            members: Vec::new(),
        }
    }

    pub fn with_version(id: impl Into<PrimitiveId>, version: u32) -> Self {
        Self {
            data: PrimitiveData::with_version(id, version),
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, role: impl Into<String>, target: PrimitiveRef) -> Self {
        self.members.push(Member::new(role, target));
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.put(key, value);
        self
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn has_member(&self, target: PrimitiveRef) -> bool {
        self.members.iter().any(|m| m.target == target)
    }

    /// Tagged `type=route`
    pub fn is_route(&self) -> bool {
        self.has_tag("type", "route")
    }

    /// Tagged `public_transport=stop_area`
    pub fn is_stop_area(&self) -> bool {
        self.has_tag("public_transport", "stop_area")
    }
}

impl OsmPrimitive for Relation {
    fn data(&self) -> &PrimitiveData {
        &self.data
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Relation
    }
}

/// A shared handle on any primitive
#[derive(Debug, Clone)]
pub enum Primitive {
    Node(Arc<Node>),
    Way(Arc<Way>),
    Relation(Arc<Relation>),
}

impl Primitive {
    fn inner(&self) -> &dyn OsmPrimitive {
        match self {
            Self::Node(n) => n.as_ref(),
            Self::Way(w) => w.as_ref(),
            Self::Relation(r) => r.as_ref(),
        }
    }

    pub fn data(&self) -> &PrimitiveData {
        self.inner().data()
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.inner().kind()
    }

    pub fn id(&self) -> PrimitiveId {
        self.inner().id()
    }

    pub fn reference(&self) -> PrimitiveRef {
        self.inner().reference()
    }

    pub fn is_incomplete(&self) -> bool {
        self.inner().is_incomplete()
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    pub fn is_way(&self) -> bool {
        matches!(self, Self::Way(_))
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Self::Relation(_))
    }

    pub fn as_way(&self) -> Option<&Arc<Way>> {
        match self {
            Self::Way(w) => Some(w),
            _ => None,
        }
    }

    pub fn into_relation(self) -> Option<Arc<Relation>> {
        match self {
            Self::Relation(r) => Some(r),
            _ => None,
        }
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        self.reference() == other.reference()
    }
}

impl Eq for Primitive {}

impl From<Node> for Primitive {
    fn from(node: Node) -> Self {
        Self::Node(Arc::new(node))
    }
}

impl From<Way> for Primitive {
    fn from(way: Way) -> Self {
        Self::Way(Arc::new(way))
    }
}

impl From<Relation> for Primitive {
    fn from(relation: Relation) -> Self {
        Self::Relation(Arc::new(relation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_only_primitive_is_incomplete() {
        assert!(Node::new(12).is_incomplete());
        assert!(!Node::new(PrimitiveId::NEW).is_incomplete());
        assert!(!Node::with_version(12, 3).is_incomplete());
    }

    #[test]
    fn test_incomplete_equals_complete_counterpart() {
        let incomplete = Way::new(7);
        let complete = Way::with_version(7, 2).with_nodes([1u64, 2]);
        assert_eq!(incomplete, complete);

        let a: Primitive = Node::new(7).into();
        let b: Primitive = Way::new(7).into();
        assert_ne!(a, b);
    }

    #[test]
    fn test_way_endpoints() {
        let way = Way::with_version(1, 1).with_nodes([10u64, 11, 12]);
        assert_eq!(way.first_node(), Some(PrimitiveId(10)));
        assert_eq!(way.last_node(), Some(PrimitiveId(12)));
        assert!(!way.is_degenerate());
        assert!(way.contains_node(PrimitiveId(11)));

        let single = Way::with_version(2, 1).with_nodes([10u64]);
        assert!(single.is_degenerate());
    }

    #[test]
    fn test_relation_tags() {
        let route = Relation::with_version(1, 1)
            .with_tag("type", "route")
            .with_tag("route", "bus")
            .with_member("", PrimitiveRef::way(3));

        assert!(route.is_route());
        assert!(!route.is_stop_area());
        assert_eq!(route.get("route"), Some("bus"));
        assert!(route.has_member(PrimitiveRef::way(3)));
        assert!(!route.has_member(PrimitiveRef::node(3)));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("way".parse::<PrimitiveKind>(), Ok(PrimitiveKind::Way));
        assert_eq!("R".parse::<PrimitiveKind>(), Ok(PrimitiveKind::Relation));
        assert!("area".parse::<PrimitiveKind>().is_err());
        assert_eq!(PrimitiveRef::node(5).to_string(), "node 5");
    }
}
