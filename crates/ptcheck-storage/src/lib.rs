//! ptcheck Storage - Primitive sources for the route checker
//!
//! This crate provides the backends the checker resolves members from:
//! an in-memory source and a loader for OSM JSON documents.

pub mod error;
pub mod memory;
pub mod osm_json;

pub use error::{StorageError, StorageResult};
pub use memory::MemorySource;
pub use osm_json::{load_file, parse_str};
