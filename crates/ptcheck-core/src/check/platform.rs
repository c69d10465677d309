//! Platform membership

use super::context::RollingContext;
use super::report::{DefectKind, Diagnostic};
use super::rules::PlacementRule;
use super::{CheckOutcome, MemberCheck, MemberKind, MemberView, State};
use std::sync::Arc;

/// Checks platform members against a [`PlacementRule`].
///
/// Platforms do not move the rolling way.
#[derive(Debug, Clone)]
pub struct PlatformCheck {
    rule: Arc<dyn PlacementRule>,
}

impl PlatformCheck {
    pub fn new(rule: Arc<dyn PlacementRule>) -> Self {
        Self { rule }
    }
}

impl MemberCheck for PlatformCheck {
    fn state(&self) -> State {
        State::Platform
    }

    fn check(&self, member: &MemberView<'_>, context: &mut RollingContext) -> CheckOutcome {
        if member.kind != MemberKind::Platform {
            return CheckOutcome::Redispatch(State::for_kind(member.kind));
        }

        match self.rule.place_platform(member.primitive, context) {
            Ok(()) => CheckOutcome::Pass,
            Err(reason) => CheckOutcome::Fail(
                Diagnostic::error(DefectKind::MisplacedPlatform, reason)
                    .with_offending([member.primitive.reference()]),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::rules::ContextRule;
    use crate::primitive::{Node, Primitive, Way};

    #[test]
    fn test_platform_after_stop() {
        let check = PlatformCheck::new(Arc::new(ContextRule));
        let mut ctx = RollingContext::new();
        ctx.set_stop_position(Arc::new(Node::with_version(1, 1)));

        let platform: Primitive = Way::with_version(2, 1).with_nodes([3u64, 4, 5, 3]).into();
        assert_eq!(
            check.check(&MemberView::new(3, "platform", &platform), &mut ctx),
            CheckOutcome::Pass
        );
        assert!(ctx.way().is_none());
    }

    #[test]
    fn test_lone_platform_is_misplaced() {
        let check = PlatformCheck::new(Arc::new(ContextRule));
        let mut ctx = RollingContext::new();

        let platform: Primitive = Node::with_version(2, 1).into();
        match check.check(&MemberView::new(0, "platform_entry_only", &platform), &mut ctx) {
            CheckOutcome::Fail(d) => {
                assert_eq!(d.kind, DefectKind::MisplacedPlatform);
                assert_eq!(d.offending, vec![platform.reference()]);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_way_is_redispatched() {
        let check = PlatformCheck::new(Arc::new(ContextRule));
        let mut ctx = RollingContext::new();
        let way: Primitive = Way::with_version(2, 1).with_nodes([1u64, 2]).into();
        assert_eq!(
            check.check(&MemberView::new(0, "", &way), &mut ctx),
            CheckOutcome::Redispatch(State::Way)
        );
    }
}
