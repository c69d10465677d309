//! Placement rules for stop positions and platforms
//!
//! Where exactly a stop position or platform may appear in a route depends on
//! the tagging scheme in use, so the decision is delegated to a
//! [`PlacementRule`]. None of the rules measure distances.

use super::context::RollingContext;
use crate::error::Error;
use crate::primitive::{Node, OsmPrimitive, Primitive};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Decides whether a stop position or platform sits where it should
pub trait PlacementRule: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Err carries the reason the stop is misplaced
    fn place_stop(&self, stop: &Node, context: &RollingContext) -> Result<(), String>;

    /// Err carries the reason the platform is misplaced
    fn place_platform(&self, platform: &Primitive, context: &RollingContext) -> Result<(), String>;
}

/// Only requires that the relevant context exists
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextRule;

impl PlacementRule for ContextRule {
    fn name(&self) -> &'static str {
        "context"
    }

    fn place_stop(&self, stop: &Node, context: &RollingContext) -> Result<(), String> {
        match context.way() {
            Some(_) => Ok(()),
            None => Err(format!("Stop position {} has no preceding way", stop.id())),
        }
    }

    fn place_platform(&self, platform: &Primitive, context: &RollingContext) -> Result<(), String> {
        if context.stop_position().is_some() || context.stop_area().is_some() {
            Ok(())
        } else {
            Err(format!(
                "Platform {} is not preceded by a stop position or stop area",
                platform.reference()
            ))
        }
    }
}

/// Requires stops to lie on the current way, and platforms to follow a stop
/// position or belong to the current stop area
#[derive(Debug, Clone, Copy, Default)]
pub struct IncidenceRule;

impl PlacementRule for IncidenceRule {
    fn name(&self) -> &'static str {
        "incidence"
    }

    fn place_stop(&self, stop: &Node, context: &RollingContext) -> Result<(), String> {
        match context.way() {
            Some(way) if way.contains_node(stop.id()) => Ok(()),
            Some(way) => Err(format!(
                "Stop position {} is not on way {}",
                stop.id(),
                way.id()
            )),
            None => Err(format!("Stop position {} has no preceding way", stop.id())),
        }
    }

    fn place_platform(&self, platform: &Primitive, context: &RollingContext) -> Result<(), String> {
        if let Some(area) = context.stop_area() {
            if area.has_member(platform.reference()) {
                return Ok(());
            }
        }
        if context.stop_position().is_some() {
            return Ok(());
        }
        Err(match context.stop_area() {
            Some(area) => format!(
                "Platform {} is not part of stop area {}",
                platform.reference(),
                area.id()
            ),
            None => format!(
                "Platform {} is not preceded by a stop position or stop area",
                platform.reference()
            ),
        })
    }
}

/// Accepts every placement
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveRule;

impl PlacementRule for PermissiveRule {
    fn name(&self) -> &'static str {
        "permissive"
    }

    fn place_stop(&self, _stop: &Node, _context: &RollingContext) -> Result<(), String> {
        Ok(())
    }

    fn place_platform(&self, _platform: &Primitive, _context: &RollingContext) -> Result<(), String> {
        Ok(())
    }
}

/// Named rule selection, used by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    #[default]
    Context,
    Incidence,
    Permissive,
}

impl RuleKind {
    pub fn build(self) -> Arc<dyn PlacementRule> {
        match self {
            Self::Context => Arc::new(ContextRule),
            Self::Incidence => Arc::new(IncidenceRule),
            Self::Permissive => Arc::new(PermissiveRule),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Incidence => "incidence",
            Self::Permissive => "permissive",
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["context", "incidence", "permissive"]
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "context" => Ok(Self::Context),
            "incidence" => Ok(Self::Incidence),
            "permissive" => Ok(Self::Permissive),
            _ => Err(Error::UnknownRule(s.to_string())),
        }
    }
}
