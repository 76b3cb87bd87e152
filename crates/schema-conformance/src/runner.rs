// crates/schema-conformance/src/runner.rs
// ============================================================================
// Module: Conformance Runner
// Description: Executes loaded suites and compares verdicts to expectations.
// Purpose: Produce per-case outcomes keyed by suite and test description.
// Dependencies: none
// ============================================================================

//! ## Overview
//! For every suite the runner builds one [`SuiteValidator`] with a fresh
//! validation region, resets it before each case, and records the verdict.
//! The validator and its region are dropped when the suite's loop ends; the
//! compiled schema stays with the [`SuiteFamily`] until it is dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticKind;
use crate::diagnostics::DiagnosticSink;
use crate::diagnostics::Severity;
use crate::engine::SchemaEngine;
use crate::model::SuiteFamily;
use crate::model::TestSuite;
use crate::report::CaseKey;
use crate::report::CaseOutcome;
use crate::report::RunReport;
use crate::validator::SuiteValidator;

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs suites against one engine.
pub struct ConformanceRunner<'a, E: SchemaEngine> {
    /// Engine under test.
    engine: &'a E,
    /// Capacity of each suite's validation region.
    validation_region_bytes: usize,
    /// Diagnostic sink.
    sink: Arc<dyn DiagnosticSink>,
}

impl<'a, E: SchemaEngine> ConformanceRunner<'a, E> {
    /// Creates a runner.
    #[must_use]
    pub fn new(engine: &'a E, validation_region_bytes: usize, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            engine,
            validation_region_bytes,
            sink,
        }
    }

    /// Runs every suite of a family in order.
    #[must_use]
    pub fn run(&self, family: &SuiteFamily<E::Schema>) -> RunReport {
        let mut outcomes = Vec::with_capacity(family.case_count());
        for suite in &family.suites {
            self.run_suite(suite, &mut outcomes);
        }
        RunReport {
            family: family.family.clone(),
            fixture: family.fixture.clone(),
            outcomes,
            load_failures: family.failures.clone(),
            skipped: family.skipped,
        }
    }

    /// Runs one suite, appending its outcomes.
    fn run_suite(&self, suite: &TestSuite<E::Schema>, outcomes: &mut Vec<CaseOutcome>) {
        let mut validator =
            SuiteValidator::new(self.engine, &suite.compiled_schema, self.validation_region_bytes);
        let mut failed = 0usize;
        for case in &suite.tests {
            validator.reset();
            let actual = validator.accept(&case.input_data);
            let outcome = CaseOutcome {
                key: CaseKey::new(&suite.description, &case.description),
                expected: case.expected_valid,
                actual,
                errors: validator.errors().to_vec(),
                omitted_errors: validator.omitted_errors(),
            };
            if !outcome.passed() {
                failed += 1;
                self.sink.record(&Diagnostic::new(
                    DiagnosticKind::CaseMismatch,
                    Severity::Error,
                    outcome.key.to_string(),
                    format!("expected valid={}, engine returned valid={actual}", case.expected_valid),
                ));
            }
            outcomes.push(outcome);
        }
        self.sink.record(&Diagnostic::new(
            DiagnosticKind::SuiteSummary,
            Severity::Info,
            &suite.description,
            format!("{} cases, {failed} failed", suite.tests.len()),
        ));
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
