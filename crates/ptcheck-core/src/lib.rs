//! ptcheck Core - Structural checks for public transport route relations
//!
//! This crate provides the primitive model (nodes, ways, relations), the
//! source trait used to resolve members, and the engine that walks a route
//! relation and reports discontinuous ways, misplaced stops and misplaced
//! platforms.

pub mod batch;
pub mod check;
pub mod dataset;
pub mod error;
pub mod primitive;
pub mod source;

pub use batch::{resolve_route, validate_batch, BatchOptions, CancelToken};
pub use check::{
    CheckEngine, DefectKind, Diagnostic, DiagnosticSink, MemberKind, NullSink, PlacementRule, Report,
    RollingContext, RuleKind, Severity, State, Stats, TracingSink,
};
pub use dataset::DataSet;
pub use error::{Error, FetchError, Result};
pub use primitive::{
    Member, Node, OsmPrimitive, Primitive, PrimitiveData, PrimitiveId, PrimitiveKind, PrimitiveRef, Relation, Way,
};
pub use source::PrimitiveSource;
