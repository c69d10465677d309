//! Rolling memory of the most recently validated elements

use crate::primitive::{Node, Relation, Way};
use std::sync::Arc;

/// The last validated way, stop position and stop area of one route.
///
/// Each slot remembers a single value; setting it overwrites the previous one.
/// A context belongs to exactly one validation run.
#[derive(Debug, Clone, Default)]
pub struct RollingContext {
    way: Option<Arc<Way>>,
    stop_position: Option<Arc<Node>>,
    stop_area: Option<Arc<Relation>>,
}

impl RollingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn way(&self) -> Option<&Arc<Way>> {
        self.way.as_ref()
    }

    pub fn set_way(&mut self, way: Arc<Way>) -> &Arc<Way> {
        self.way.insert(way)
    }

    pub fn stop_position(&self) -> Option<&Arc<Node>> {
        self.stop_position.as_ref()
    }

    pub fn set_stop_position(&mut self, stop: Arc<Node>) -> &Arc<Node> {
        self.stop_position.insert(stop)
    }

    pub fn clear_stop_position(&mut self) {
        self.stop_position = None;
    }

    pub fn stop_area(&self) -> Option<&Arc<Relation>> {
        self.stop_area.as_ref()
    }

    pub fn set_stop_area(&mut self, area: Arc<Relation>) -> &Arc<Relation> {
        self.stop_area.insert(area)
    }

    /// Clear all three slots
    pub fn reset(&mut self) {
        self.way = None;
        self.stop_position = None;
        self.stop_area = None;
    }

    pub fn is_empty(&self) -> bool {
        self.way.is_none() && self.stop_position.is_none() && self.stop_area.is_none()
    }
}
