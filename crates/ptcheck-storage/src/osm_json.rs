//! OSM JSON document loader
//!
//! Reads the `elements` format produced by the OSM API 0.6 (`.json`
//! endpoints) and Overpass (`[out:json]`). Every element in the document is
//! complete. Ids referenced by ways and relations but absent from the
//! document are added as incomplete placeholders, so resolving them yields
//! [`FetchError::Incomplete`](ptcheck_core::FetchError::Incomplete) rather
//! than a silent gap.

use crate::error::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use ptcheck_core::{
    DataSet, Node, PrimitiveData, PrimitiveId, PrimitiveKind, PrimitiveRef, Relation, Way,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
    Node {
        #[serde(flatten)]
        common: Common,
    },
    Way {
        #[serde(flatten)]
        common: Common,
        #[serde(default)]
        nodes: Vec<i64>,
    },
    Relation {
        #[serde(flatten)]
        common: Common,
        #[serde(default)]
        members: Vec<WireMember>,
    },
}

#[derive(Debug, Deserialize)]
struct Common {
    id: i64,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    tags: BTreeMap<String, String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct WireMember {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "ref")]
    id: i64,
    #[serde(default)]
    role: String,
}

fn to_id(kind: PrimitiveKind, id: i64) -> StorageResult<PrimitiveId> {
    if id <= 0 {
        return Err(StorageError::InvalidId {
            kind: kind.to_string(),
            id,
        });
    }
    Ok(PrimitiveId(id as u64))
}

impl Common {
    fn into_data(self, kind: PrimitiveKind) -> StorageResult<PrimitiveData> {
        let mut data = PrimitiveData::with_version(to_id(kind, self.id)?, self.version);
        data.tags = self.tags;
        data.timestamp = self.timestamp;
        Ok(data)
    }
}

/// Parse an OSM JSON document into a data set
pub fn parse_str(input: &str) -> StorageResult<DataSet> {
    let document: Document = serde_json::from_str(input)?;
    let mut dataset = DataSet::new();
    let mut referenced: Vec<PrimitiveRef> = Vec::new();

    for element in document.elements {
        match element {
            Element::Node { common } => {
                dataset.add_node(Node {
                    data: common.into_data(PrimitiveKind::Node)?,
                });
            }
            Element::Way { common, nodes } => {
                let nodes = nodes
                    .into_iter()
                    .map(|id| to_id(PrimitiveKind::Node, id))
                    .collect::<StorageResult<Vec<_>>>()?;
                referenced.extend(nodes.iter().copied().map(PrimitiveRef::node));
                dataset.add_way(Way {
                    data: common.into_data(PrimitiveKind::Way)?,
                    nodes,
                });
            }
            Element::Relation { common, members } => {
                let mut relation = Relation {
                    data: common.into_data(PrimitiveKind::Relation)?,
                    members: Vec::with_capacity(members.len()),
                };
                for member in members {
                    let kind: PrimitiveKind = member
                        .kind
                        .parse()
                        .map_err(|_| StorageError::UnknownMemberType(member.kind.clone()))?;
                    let target = PrimitiveRef::new(kind, to_id(kind, member.id)?);
                    referenced.push(target);
                    relation = relation.with_member(member.role, target);
                }
                dataset.add_relation(relation);
            }
        }
    }

    let mut placeholders = 0usize;
    for reference in referenced {
        if dataset.get(reference).is_some() {
            continue;
        }
        placeholders += 1;
        match reference.kind {
            PrimitiveKind::Node => dataset.add_node(Node::new(reference.id)),
            PrimitiveKind::Way => dataset.add_way(Way::new(reference.id)),
            PrimitiveKind::Relation => dataset.add_relation(Relation::new(reference.id)),
        };
    }

    tracing::debug!(
        primitives = dataset.len(),
        placeholders,
        "parsed OSM JSON document"
    );
    Ok(dataset)
}

/// Read and parse an OSM JSON file
pub async fn load_file(path: impl AsRef<Path>) -> StorageResult<DataSet> {
    let path = path.as_ref();
    tracing::debug!("Loading OSM data from {:?}", path);
    let input = tokio::fs::read_to_string(path).await?;
    parse_str(&input)
}
