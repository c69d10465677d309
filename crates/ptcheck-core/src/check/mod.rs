//! Route relation checking
//!
//! A [`CheckEngine`] walks the members of a route relation in order. Each
//! member is handed to the checker of the engine's active [`State`]. A checker
//! either claims the member and applies its rule, or asks the engine to
//! switch to the checker that matches the member and try again. Rules share
//! what they learned through a [`RollingContext`].

pub mod context;
pub mod engine;
pub mod platform;
pub mod report;
pub mod route;
pub mod rules;
pub mod sink;
pub mod stop_position;
pub mod way;

pub use context::RollingContext;
pub use engine::{CheckEngine, MAX_REDISPATCH};
pub use platform::PlatformCheck;
pub use report::{DefectKind, Diagnostic, MemberVerdict, Report, Severity, Stats};
pub use route::RouteCheck;
pub use rules::{ContextRule, IncidenceRule, PermissiveRule, PlacementRule, RuleKind};
pub use sink::{DiagnosticSink, NullSink, TracingSink};
pub use stop_position::StopPositionCheck;
pub use way::{are_contiguous, WayCheck};

use crate::primitive::Primitive;
use serde::{Deserialize, Serialize};

/// Active checker of an engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Initial state of every validation run
    #[default]
    Route,
    Way,
    StopPosition,
    Platform,
}

impl State {
    /// The state whose checker claims members of `kind`
    pub fn for_kind(kind: MemberKind) -> Self {
        match kind {
            MemberKind::Way => Self::Way,
            MemberKind::StopPosition => Self::StopPosition,
            MemberKind::Platform => Self::Platform,
            MemberKind::StopArea | MemberKind::Unrecognized => Self::Route,
        }
    }
}

/// What a member is, judged from its role and primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Way,
    StopPosition,
    Platform,
    StopArea,
    Unrecognized,
}

impl MemberKind {
    pub fn classify(role: &str, primitive: &Primitive) -> Self {
        match role {
            "stop" | "stop_entry_only" | "stop_exit_only" => Self::StopPosition,
            "platform" | "platform_entry_only" | "platform_exit_only" => Self::Platform,
            "" | "forward" | "backward" if primitive.is_way() => Self::Way,
            _ => match primitive {
                Primitive::Relation(r) if r.is_stop_area() => Self::StopArea,
                _ => Self::Unrecognized,
            },
        }
    }
}

/// A resolved member as seen by a checker
#[derive(Debug, Clone, Copy)]
pub struct MemberView<'a> {
    pub index: usize,
    pub role: &'a str,
    pub primitive: &'a Primitive,
    pub kind: MemberKind,
}

impl<'a> MemberView<'a> {
    pub fn new(index: usize, role: &'a str, primitive: &'a Primitive) -> Self {
        Self {
            index,
            role,
            primitive,
            kind: MemberKind::classify(role, primitive),
        }
    }
}

/// Result of offering a member to one checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Fail(Diagnostic),
    /// The member belongs to another checker
    Redispatch(State),
}

/// A role-specific checker
pub trait MemberCheck: Send + Sync {
    fn state(&self) -> State;

    fn check(&self, member: &MemberView<'_>, context: &mut RollingContext) -> CheckOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Node, PrimitiveRef, Relation, Way};

    #[test]
    fn test_classify_members() {
        let way: Primitive = Way::with_version(1, 1).into();
        let node: Primitive = Node::with_version(1, 1).into();
        let area: Primitive = Relation::with_version(1, 1)
            .with_tag("public_transport", "stop_area")
            .into();
        let other: Primitive = Relation::with_version(2, 1)
            .with_member("", PrimitiveRef::way(1))
            .into();

        assert_eq!(MemberKind::classify("", &way), MemberKind::Way);
        assert_eq!(MemberKind::classify("forward", &way), MemberKind::Way);
        assert_eq!(MemberKind::classify("stop", &node), MemberKind::StopPosition);
        assert_eq!(MemberKind::classify("stop_exit_only", &way), MemberKind::StopPosition);
        assert_eq!(MemberKind::classify("platform", &way), MemberKind::Platform);
        assert_eq!(MemberKind::classify("", &area), MemberKind::StopArea);
        assert_eq!(MemberKind::classify("", &node), MemberKind::Unrecognized);
        assert_eq!(MemberKind::classify("", &other), MemberKind::Unrecognized);
        assert_eq!(MemberKind::classify("via", &way), MemberKind::Unrecognized);
    }

    #[test]
    fn test_state_for_kind() {
        assert_eq!(State::for_kind(MemberKind::Way), State::Way);
        assert_eq!(State::for_kind(MemberKind::StopArea), State::Route);
        assert_eq!(State::for_kind(MemberKind::Unrecognized), State::Route);
        assert_eq!(State::default(), State::Route);
    }
}
