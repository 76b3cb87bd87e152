// crates/schema-conformance/src/report.rs
// ============================================================================
// Module: Conformance Reports
// Description: Per-case outcomes, load failures, and run summaries.
// Purpose: Make every failure locatable by suite and test description.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Outcomes are keyed by [`CaseKey`] (`"<suite> :: <test>"`). A
//! [`RunReport`] covers one fixture file; a [`HarnessReport`] aggregates a
//! whole invocation. Reports serialize to JSON for archiving.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

use crate::model::SkipCounts;

// ============================================================================
// SECTION: Case Outcomes
// ============================================================================

/// Compound key identifying one test case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CaseKey {
    /// Suite description.
    pub suite: String,
    /// Test description.
    pub test: String,
}

impl CaseKey {
    /// Creates a case key.
    #[must_use]
    pub fn new(suite: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            test: test.into(),
        }
    }
}

impl fmt::Display for CaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: {}", self.suite, self.test)
    }
}

/// Result of running one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOutcome {
    /// Case key.
    pub key: CaseKey,
    /// Expected verdict from the fixture.
    pub expected: bool,
    /// Verdict returned by the engine.
    pub actual: bool,
    /// Engine error details retained for the case.
    pub errors: Vec<String>,
    /// Error details that exceeded the validation region.
    pub omitted_errors: usize,
}

impl CaseOutcome {
    /// Returns true if the verdict matched the expectation.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

// ============================================================================
// SECTION: Load Failures
// ============================================================================

/// Load failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailureKind {
    /// A fixture or remote document overflowed its region.
    RegionExhausted,
    /// The engine could not compile a suite schema.
    SchemaCompile,
}

/// A load-time failure that makes the run unsuccessful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    /// Fixture file name.
    pub fixture: String,
    /// Suite description when the failure is suite-scoped.
    pub suite: Option<String>,
    /// Failure classification.
    pub kind: LoadFailureKind,
    /// Failure detail.
    pub message: String,
}

// ============================================================================
// SECTION: Run Reports
// ============================================================================

/// Outcomes for one fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Fixture family id.
    pub family: String,
    /// Fixture file name.
    pub fixture: String,
    /// Case outcomes in execution order.
    pub outcomes: Vec<CaseOutcome>,
    /// Load failures for the fixture.
    pub load_failures: Vec<LoadFailure>,
    /// Exclusion and malformed-input counters.
    pub skipped: SkipCounts,
}

impl RunReport {
    /// Returns the number of passing cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.passed()).count()
    }

    /// Returns the number of failing cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// Returns the failing case outcomes.
    pub fn mismatches(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed())
    }

    /// Returns true when every case passed and nothing failed to load.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.load_failures.is_empty() && self.outcomes.iter().all(CaseOutcome::passed)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}/{}: {} passed, {} failed, {} suites and {} tests excluded",
            self.family,
            self.fixture,
            self.passed(),
            self.failed(),
            self.skipped.suites,
            self.skipped.tests
        )?;
        for outcome in self.mismatches() {
            writeln!(
                f,
                "  {} (expected {}, got {})",
                outcome.key,
                verdict_label(outcome.expected),
                verdict_label(outcome.actual)
            )?;
        }
        for failure in &self.load_failures {
            match &failure.suite {
                Some(suite) => writeln!(f, "  load failure in {suite}: {}", failure.message)?,
                None => writeln!(f, "  load failure: {}", failure.message)?,
            }
        }
        Ok(())
    }
}

/// Aggregate over every fixture file of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HarnessReport {
    /// Per-fixture reports in run order.
    pub runs: Vec<RunReport>,
}

impl HarnessReport {
    /// Returns the number of executed cases.
    #[must_use]
    pub fn total_cases(&self) -> usize {
        self.runs.iter().map(|run| run.outcomes.len()).sum()
    }

    /// Returns the number of failing cases.
    #[must_use]
    pub fn total_failed(&self) -> usize {
        self.runs.iter().map(RunReport::failed).sum()
    }

    /// Returns true when every fixture run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.runs.iter().all(RunReport::is_success)
    }
}

impl fmt::Display for HarnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            write!(f, "{run}")?;
        }
        writeln!(f, "total: {} cases, {} failed", self.total_cases(), self.total_failed())
    }
}

/// Returns a verdict label for display.
const fn verdict_label(valid: bool) -> &'static str {
    if valid { "valid" } else { "invalid" }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
