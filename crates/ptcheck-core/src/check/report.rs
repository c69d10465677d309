//! Diagnostics and per-relation reports

use crate::primitive::{PrimitiveId, PrimitiveRef};
use serde::{Deserialize, Serialize};

/// How bad a diagnostic is. Only errors fail a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Category of structural defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectKind {
    /// Two consecutive ways share no endpoint
    NotAdjacent,
    /// A way with fewer than two nodes
    DegenerateWay,
    /// A stop position member that is not a node
    StopNotNode,
    MisplacedStop,
    MisplacedPlatform,
    UnrecognizedMember,
    /// The checked relation is not tagged `type=route`
    NotARoute,
    MissingRouteTag,
}

/// One finding, attributable to a member or to the relation itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Position of the offending member, None for relation-level findings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_index: Option<usize>,

    pub severity: Severity,

    pub kind: DefectKind,

    pub message: String,

    #[serde(default)]
    pub offending: Vec<PrimitiveRef>,
}

impl Diagnostic {
    pub fn error(kind: DefectKind, message: impl Into<String>) -> Self {
        Self {
            member_index: None,
            severity: Severity::Error,
            kind,
            message: message.into(),
            offending: Vec::new(),
        }
    }

    pub fn warning(kind: DefectKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind, message)
        }
    }

    pub fn with_offending(mut self, offending: impl IntoIterator<Item = PrimitiveRef>) -> Self {
        self.offending.extend(offending);
        self
    }

    /// Attribute the diagnostic to a member position
    pub fn at(mut self, index: usize) -> Self {
        self.member_index = Some(index);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.member_index {
            Some(i) => write!(f, "[{}] member #{}: {}", self.severity, i, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Counters collected while walking a relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub members_checked: usize,
    pub failed_members: usize,
    pub redispatches: usize,
}

/// Outcome of validating one route relation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub relation: PrimitiveId,

    /// Logical AND of every member verdict
    pub passed: bool,

    pub diagnostics: Vec<Diagnostic>,

    pub stats: Stats,
}

impl Report {
    pub fn new(relation: PrimitiveId) -> Self {
        Self {
            relation,
            passed: true,
            diagnostics: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Record the verdict of one member
    pub fn record(&mut self, verdict: MemberVerdict) {
        self.stats.members_checked += 1;
        self.stats.redispatches += verdict.redispatches;
        if !verdict.passed {
            self.stats.failed_members += 1;
            self.passed = false;
        }
        self.diagnostics.extend(verdict.diagnostic);
    }

    /// Add a finding about the relation itself
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.passed = false;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

/// Verdict on a single member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberVerdict {
    pub passed: bool,
    pub diagnostic: Option<Diagnostic>,
    pub redispatches: usize,
}

impl MemberVerdict {
    pub fn pass(redispatches: usize) -> Self {
        Self {
            passed: true,
            diagnostic: None,
            redispatches,
        }
    }

    pub fn fail(diagnostic: Diagnostic, redispatches: usize) -> Self {
        Self {
            passed: false,
            diagnostic: Some(diagnostic),
            redispatches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_do_not_fail_report() {
        let mut report = Report::new(PrimitiveId(1));
        report.push(Diagnostic::warning(DefectKind::MissingRouteTag, "no route tag"));
        assert!(report.passed);
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.errors().count(), 0);
    }

    #[test]
    fn test_failed_member_fails_report_and_keeps_going() {
        let mut report = Report::new(PrimitiveId(1));
        report.record(MemberVerdict::fail(
            Diagnostic::error(DefectKind::NotAdjacent, "Ways 1 and 2 are not adjacent").at(1),
            0,
        ));
        report.record(MemberVerdict::pass(1));

        assert!(!report.passed);
        assert_eq!(report.stats.members_checked, 2);
        assert_eq!(report.stats.failed_members, 1);
        assert_eq!(report.stats.redispatches, 1);
        assert_eq!(
            report.diagnostics[0].to_string(),
            "[error] member #1: Ways 1 and 2 are not adjacent"
        );
    }
}
