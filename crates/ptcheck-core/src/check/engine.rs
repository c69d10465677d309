//! The route checking state machine

use super::context::RollingContext;
use super::platform::PlatformCheck;
use super::report::{DefectKind, Diagnostic, MemberVerdict, Report};
use super::route::RouteCheck;
use super::rules::{PlacementRule, RuleKind};
use super::sink::{DiagnosticSink, TracingSink};
use super::stop_position::StopPositionCheck;
use super::way::WayCheck;
use super::{CheckOutcome, MemberCheck, MemberView, State};
use crate::batch::CancelToken;
use crate::error::{Error, Result};
use crate::primitive::{OsmPrimitive, Primitive, Relation};
use crate::source::PrimitiveSource;
use std::sync::Arc;

/// How many times a single member may be handed to another checker.
///
/// Every member kind has exactly one claiming checker, so one hop suffices.
pub const MAX_REDISPATCH: usize = 1;

/// Validates route relations one member at a time.
///
/// An engine owns its state and rolling context; run one engine per relation
/// being validated concurrently.
pub struct CheckEngine {
    state: State,
    context: RollingContext,
    route: RouteCheck,
    way: WayCheck,
    stop_position: StopPositionCheck,
    platform: PlatformCheck,
    rule: Arc<dyn PlacementRule>,
    sink: Arc<dyn DiagnosticSink>,
    cancel: CancelToken,
}

impl Default for CheckEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckEngine {
    /// Engine with the default placement rule, logging through tracing
    pub fn new() -> Self {
        Self::with_rule(RuleKind::default().build())
    }

    pub fn with_rule(rule: Arc<dyn PlacementRule>) -> Self {
        Self {
            state: State::Route,
            context: RollingContext::new(),
            route: RouteCheck,
            way: WayCheck,
            stop_position: StopPositionCheck::new(rule.clone()),
            platform: PlatformCheck::new(rule.clone()),
            rule,
            sink: Arc::new(TracingSink),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn rule(&self) -> &dyn PlacementRule {
        self.rule.as_ref()
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Switch the active checker and return it
    pub fn set_state(&mut self, state: State) -> &dyn MemberCheck {
        if state != self.state {
            tracing::debug!(from = ?self.state, to = ?state, "switching checker");
        }
        self.state = state;
        self.checker(state)
    }

    pub fn checker(&self, state: State) -> &dyn MemberCheck {
        match state {
            State::Route => &self.route,
            State::Way => &self.way,
            State::StopPosition => &self.stop_position,
            State::Platform => &self.platform,
        }
    }

    pub fn context(&self) -> &RollingContext {
        &self.context
    }

    /// Forget everything learned about the previous relation
    pub fn reset(&mut self) {
        self.state = State::Route;
        self.context.reset();
    }

    fn dispatch(&mut self, member: &MemberView<'_>) -> CheckOutcome {
        let context = &mut self.context;
        match self.state {
            State::Route => self.route.check(member, context),
            State::Way => self.way.check(member, context),
            State::StopPosition => self.stop_position.check(member, context),
            State::Platform => self.platform.check(member, context),
        }
    }

    /// Check one resolved member with the active checker, following at most
    /// [`MAX_REDISPATCH`] hand-overs.
    pub fn check_member(&mut self, index: usize, role: &str, primitive: &Primitive) -> MemberVerdict {
        let member = MemberView::new(index, role, primitive);
        let mut hops = 0;

        loop {
            match self.dispatch(&member) {
                CheckOutcome::Pass => return MemberVerdict::pass(hops),
                CheckOutcome::Fail(diagnostic) => {
                    let diagnostic = diagnostic.at(index);
                    self.sink.log(&diagnostic);
                    return MemberVerdict::fail(diagnostic, hops);
                }
                CheckOutcome::Redispatch(next) if hops < MAX_REDISPATCH && next != self.state => {
                    hops += 1;
                    self.set_state(next);
                }
                CheckOutcome::Redispatch(next) => {
                    tracing::debug!(index, ?next, "re-dispatch limit reached");
                    let diagnostic = Diagnostic::error(
                        DefectKind::UnrecognizedMember,
                        format!(
                            "Unrecognized member role '{}' for {}",
                            role,
                            primitive.reference()
                        ),
                    )
                    .with_offending([primitive.reference()])
                    .at(index);
                    self.sink.log(&diagnostic);
                    return MemberVerdict::fail(diagnostic, hops);
                }
            }
        }
    }

    /// Validate a route relation, resolving each member through `source`.
    ///
    /// Structural defects end up in the report; failing to resolve a member
    /// aborts the run with an error.
    pub async fn validate<S>(&mut self, route: &Relation, source: &S) -> Result<Report>
    where
        S: PrimitiveSource + ?Sized,
    {
        self.reset();
        let mut report = Report::new(route.id());
        tracing::debug!(relation = %route.id(), members = route.members().len(), "validating route");

        for diagnostic in route_diagnostics(route) {
            self.sink.log(&diagnostic);
            report.push(diagnostic);
        }

        for (index, member) in route.members().iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.reset();
                return Err(Error::Cancelled(route.id()));
            }

            let primitive = match source.resolve(member.target).await {
                Ok(p) => p,
                Err(e) => {
                    self.reset();
                    return Err(e.into());
                }
            };
            let verdict = self.check_member(index, &member.role, &primitive);
            report.record(verdict);
        }

        self.reset();
        tracing::info!(
            relation = %route.id(),
            passed = report.passed,
            defects = report.errors().count(),
            "route validated"
        );
        Ok(report)
    }
}

/// Findings about the route relation itself
fn route_diagnostics(route: &Relation) -> Vec<Diagnostic> {
    if !route.is_route() {
        vec![Diagnostic::warning(
            DefectKind::NotARoute,
            format!("Relation {} is not tagged type=route", route.id()),
        )
        .with_offending([route.reference()])]
    } else if route.get("route").is_none() {
        vec![Diagnostic::warning(
            DefectKind::MissingRouteTag,
            format!("Route {} has no route=* tag", route.id()),
        )
        .with_offending([route.reference()])]
    } else {
        Vec::new()
    }
}
