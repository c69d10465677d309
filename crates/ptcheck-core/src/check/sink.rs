//! Destinations for diagnostics as they are found

use super::report::{Diagnostic, Severity};

/// Receives each diagnostic the moment it is emitted
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, diagnostic: &Diagnostic);
}

/// Emits diagnostics as tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Error => tracing::warn!(
                member = ?diagnostic.member_index,
                kind = ?diagnostic.kind,
                "{}",
                diagnostic.message
            ),
            Severity::Warning => tracing::info!(
                member = ?diagnostic.member_index,
                kind = ?diagnostic.kind,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn log(&self, _diagnostic: &Diagnostic) {}
}
