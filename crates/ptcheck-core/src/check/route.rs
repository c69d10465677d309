//! Route-level bookkeeping and the fallback for unknown members

use super::context::RollingContext;
use super::report::{DefectKind, Diagnostic};
use super::{CheckOutcome, MemberCheck, MemberKind, MemberView, State};
use crate::primitive::Primitive;

/// Initial checker of every run. Records stop areas and reports members no
/// other checker claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteCheck;

impl MemberCheck for RouteCheck {
    fn state(&self) -> State {
        State::Route
    }

    fn check(&self, member: &MemberView<'_>, context: &mut RollingContext) -> CheckOutcome {
        match (member.kind, member.primitive) {
            (MemberKind::StopArea, Primitive::Relation(area)) => {
                context.set_stop_area(area.clone());
                CheckOutcome::Pass
            }
            (MemberKind::StopArea | MemberKind::Unrecognized, other) => CheckOutcome::Fail(
                Diagnostic::error(
                    DefectKind::UnrecognizedMember,
                    format!(
                        "Unrecognized member role '{}' for {}",
                        member.role,
                        other.reference()
                    ),
                )
                .with_offending([other.reference()]),
            ),
            (kind, _) => CheckOutcome::Redispatch(State::for_kind(kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Node, PrimitiveRef, Relation, Way};

    #[test]
    fn test_stop_area_is_remembered() {
        let mut ctx = RollingContext::new();
        let area: Primitive = Relation::with_version(4, 1)
            .with_tag("public_transport", "stop_area")
            .into();

        assert_eq!(
            RouteCheck.check(&MemberView::new(0, "", &area), &mut ctx),
            CheckOutcome::Pass
        );
        assert!(ctx.stop_area().is_some());
    }

    #[test]
    fn test_unknown_member() {
        let mut ctx = RollingContext::new();
        let node: Primitive = Node::with_version(4, 1).into();

        match RouteCheck.check(&MemberView::new(2, "via", &node), &mut ctx) {
            CheckOutcome::Fail(d) => {
                assert_eq!(d.kind, DefectKind::UnrecognizedMember);
                assert_eq!(d.message, "Unrecognized member role 'via' for node 4");
                assert_eq!(d.offending, vec![PrimitiveRef::node(4)]);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_claimed_members_are_redispatched() {
        let mut ctx = RollingContext::new();
        let way: Primitive = Way::with_version(1, 1).with_nodes([1u64, 2]).into();
        assert_eq!(
            RouteCheck.check(&MemberView::new(0, "", &way), &mut ctx),
            CheckOutcome::Redispatch(State::Way)
        );
    }
}
