// crates/schema-conformance/src/diagnostics.rs
// ============================================================================
// Module: Harness Diagnostics
// Description: Structured diagnostic events for fixture loading and runs.
// Purpose: Emit JSON-line diagnostics without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every skip, unresolved reference, and verdict mismatch is reported as a
//! [`Diagnostic`] through a [`DiagnosticSink`]. Sinks are the only shared
//! mutable state in the harness and must be safe to call from any thread.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Diagnostic classification.
///
/// # Invariants
/// - Variants are stable for log consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A fixture file was not found under any search prefix.
    FixtureNotFound,
    /// A fixture or remote file exists but could not be read.
    FixtureUnreadable,
    /// A fixture file or fixture group could not be parsed.
    FixtureParseError,
    /// A candidate fixture path exceeded the configured maximum length.
    PathTooLong,
    /// A remote reference pointed outside the local registry.
    UnsupportedRemoteHost,
    /// A remote reference mapped to a missing fixture.
    RemoteNotFound,
    /// A remote fixture could not be parsed.
    RemoteParseError,
    /// A memory region was exhausted while reading a fixture.
    RegionExhausted,
    /// The engine rejected a suite schema.
    SchemaCompileError,
    /// A suite or test was skipped by the exclusion registry.
    ExclusionSkip,
    /// A test case verdict disagreed with its expectation.
    CaseMismatch,
    /// Per-suite execution summary.
    SuiteSummary,
}

impl DiagnosticKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FixtureNotFound => "fixture_not_found",
            Self::FixtureUnreadable => "fixture_unreadable",
            Self::FixtureParseError => "fixture_parse_error",
            Self::PathTooLong => "path_too_long",
            Self::UnsupportedRemoteHost => "unsupported_remote_host",
            Self::RemoteNotFound => "remote_not_found",
            Self::RemoteParseError => "remote_parse_error",
            Self::RegionExhausted => "region_exhausted",
            Self::SchemaCompileError => "schema_compile_error",
            Self::ExclusionSkip => "exclusion_skip",
            Self::CaseMismatch => "case_mismatch",
            Self::SuiteSummary => "suite_summary",
        }
    }
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; intentional behavior.
    Info,
    /// A unit of work was skipped.
    Warning,
    /// A unit of work failed.
    Error,
    /// A region overflow aborted a compilation.
    Fatal,
}

/// Harness diagnostic event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Diagnostic classification.
    pub kind: DiagnosticKind,
    /// Diagnostic severity.
    pub severity: Severity,
    /// Subject of the event: a fixture path, URI, or case key.
    pub subject: String,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic with a consistent timestamp.
    #[must_use]
    pub fn new(
        kind: DiagnosticKind,
        severity: Severity,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "conformance_diagnostic",
            timestamp_ms,
            kind,
            severity,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for harness diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Record a diagnostic event.
    fn record(&self, diagnostic: &Diagnostic);
}

/// Diagnostic sink that logs JSON lines to stderr.
pub struct StderrDiagnosticSink;

impl DiagnosticSink for StderrDiagnosticSink {
    fn record(&self, diagnostic: &Diagnostic) {
        if let Ok(payload) = serde_json::to_string(diagnostic) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Diagnostic sink that logs JSON lines to a file.
pub struct FileDiagnosticSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileDiagnosticSink {
    /// Opens the diagnostic log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl DiagnosticSink for FileDiagnosticSink {
    fn record(&self, diagnostic: &Diagnostic) {
        if let Ok(payload) = serde_json::to_string(diagnostic)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op diagnostic sink.
pub struct NoopDiagnosticSink;

impl DiagnosticSink for NoopDiagnosticSink {
    fn record(&self, _diagnostic: &Diagnostic) {}
}

/// Diagnostic sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryDiagnosticSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<Diagnostic>>,
}

impl MemoryDiagnosticSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns the recorded events of one kind.
    #[must_use]
    pub fn events_of(&self, kind: DiagnosticKind) -> Vec<Diagnostic> {
        self.events().into_iter().filter(|event| event.kind == kind).collect()
    }
}

impl DiagnosticSink for MemoryDiagnosticSink {
    fn record(&self, diagnostic: &Diagnostic) {
        if let Ok(mut events) = self.events.lock() {
            events.push(diagnostic.clone());
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use serde_json::Value;

    use super::*;

    #[test]
    fn diagnostic_serializes_with_stable_labels() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::UnsupportedRemoteHost,
            Severity::Warning,
            "https://example.com/schema.json",
            "external host not supported",
        );
        let value: Value = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(value["event"], "conformance_diagnostic");
        assert_eq!(value["kind"], DiagnosticKind::UnsupportedRemoteHost.as_str());
        assert_eq!(value["severity"], "warning");
        assert_eq!(value["subject"], "https://example.com/schema.json");
    }

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagnostics.jsonl");
        let sink = FileDiagnosticSink::new(&path).unwrap();
        sink.record(&Diagnostic::new(DiagnosticKind::FixtureNotFound, Severity::Warning, "a", "x"));
        sink.record(&Diagnostic::new(DiagnosticKind::ExclusionSkip, Severity::Info, "b", "y"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> =
            content.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["kind"], "fixture_not_found");
        assert_eq!(lines[1]["kind"], "exclusion_skip");
    }

    #[test]
    fn memory_sink_filters_by_kind() {
        let sink = MemoryDiagnosticSink::new();
        sink.record(&Diagnostic::new(DiagnosticKind::FixtureNotFound, Severity::Warning, "a", ""));
        sink.record(&Diagnostic::new(DiagnosticKind::CaseMismatch, Severity::Error, "b", ""));
        assert_eq!(sink.events().len(), 2);
        let mismatches = sink.events_of(DiagnosticKind::CaseMismatch);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].subject, "b");
    }
}
