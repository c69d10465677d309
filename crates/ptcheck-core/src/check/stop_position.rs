//! Placement of stop positions along the route

use super::context::RollingContext;
use super::report::{DefectKind, Diagnostic};
use super::rules::PlacementRule;
use super::{CheckOutcome, MemberCheck, MemberKind, MemberView, State};
use crate::primitive::{OsmPrimitive, Primitive};
use std::sync::Arc;

/// Checks stop-position members against a [`PlacementRule`]
#[derive(Debug, Clone)]
pub struct StopPositionCheck {
    rule: Arc<dyn PlacementRule>,
}

impl StopPositionCheck {
    pub fn new(rule: Arc<dyn PlacementRule>) -> Self {
        Self { rule }
    }
}

impl MemberCheck for StopPositionCheck {
    fn state(&self) -> State {
        State::StopPosition
    }

    fn check(&self, member: &MemberView<'_>, context: &mut RollingContext) -> CheckOutcome {
        if member.kind != MemberKind::StopPosition {
            return CheckOutcome::Redispatch(State::for_kind(member.kind));
        }

        let stop = match member.primitive {
            Primitive::Node(node) => node,
            other => {
                return CheckOutcome::Fail(
                    Diagnostic::error(
                        DefectKind::StopNotNode,
                        format!("Stop position {} is not a node", other.reference()),
                    )
                    .with_offending([other.reference()]),
                )
            }
        };

        let placed = self.rule.place_stop(stop, context);
        // Remember the stop even when misplaced so its platform is not flagged too
        context.set_stop_position(stop.clone());

        match placed {
            Ok(()) => CheckOutcome::Pass,
            Err(reason) => {
                let mut offending = vec![stop.reference()];
                offending.extend(context.way().map(|w| w.reference()));
                CheckOutcome::Fail(
                    Diagnostic::error(DefectKind::MisplacedStop, reason).with_offending(offending),
                )
            }
        }
    }
}
