//! Continuity of consecutive ways

use super::context::RollingContext;
use super::report::{DefectKind, Diagnostic};
use super::{CheckOutcome, MemberCheck, MemberKind, MemberView, State};
use crate::primitive::{OsmPrimitive, Way};

/// Two ways are contiguous when they share an endpoint.
///
/// Degenerate ways have no endpoints and are never contiguous.
pub fn are_contiguous(w1: &Way, w2: &Way) -> bool {
    match (w1.first_node(), w1.last_node(), w2.first_node(), w2.last_node()) {
        (Some(f1), Some(l1), Some(f2), Some(l2)) => f1 == f2 || l1 == l2 || l1 == f2 || f1 == l2,
        _ => false,
    }
}

/// Checks that each way of a route touches the previous one
#[derive(Debug, Clone, Copy, Default)]
pub struct WayCheck;

impl MemberCheck for WayCheck {
    fn state(&self) -> State {
        State::Way
    }

    fn check(&self, member: &MemberView<'_>, context: &mut RollingContext) -> CheckOutcome {
        let way = match member.primitive.as_way() {
            Some(way) if member.kind == MemberKind::Way => way,
            _ => return CheckOutcome::Redispatch(State::for_kind(member.kind)),
        };

        // A new way invalidates the stop position found on the previous one
        context.clear_stop_position();

        if way.is_degenerate() {
            return CheckOutcome::Fail(
                Diagnostic::error(
                    DefectKind::DegenerateWay,
                    format!("Way {} has fewer than two nodes", way.id()),
                )
                .with_offending([way.reference()]),
            );
        }

        let previous = context.way().cloned();
        // Point at the current way even when it is not adjacent, so one gap
        // is reported once instead of against every following way
        context.set_way(way.clone());

        match previous {
            Some(last) if !are_contiguous(&last, way) => {
                tracing::debug!(last = %last.id(), current = %way.id(), "ways are not adjacent");
                CheckOutcome::Fail(
                    Diagnostic::error(
                        DefectKind::NotAdjacent,
                        format!("Ways {} and {} are not adjacent", last.id(), way.id()),
                    )
                    .with_offending([last.reference(), way.reference()]),
                )
            }
            _ => CheckOutcome::Pass,
        }
    }
}
