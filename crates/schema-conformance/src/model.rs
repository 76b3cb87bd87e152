// crates/schema-conformance/src/model.rs
// ============================================================================
// Module: Conformance Data Model
// Description: Test cases, suites, and per-fixture suite families.
// Purpose: Own loaded fixtures for the duration of one run.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`SuiteFamily`] owns every [`TestSuite`] loaded from one fixture file; a
//! suite owns its compiled schema and its [`TestCase`]s. Dropping the family
//! releases everything, newest suite first. The `Fixture*` types mirror the
//! JSON Schema Test Suite file format, which is a fixed external contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::report::LoadFailure;

// ============================================================================
// SECTION: Fixture Format
// ============================================================================

/// One group of a fixture file: a schema and the cases run against it.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureGroup {
    /// Suite description.
    pub description: String,
    /// Schema under test.
    pub schema: Value,
    /// Raw cases, decoded one at a time so a malformed case only skips itself.
    pub tests: Vec<Value>,
}

/// One case of a fixture group.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureCase {
    /// Case description.
    pub description: String,
    /// Instance document.
    pub data: Value,
    /// Expected verdict.
    pub valid: bool,
}

// ============================================================================
// SECTION: Loaded Model
// ============================================================================

/// A loaded test case.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// Case description.
    pub description: String,
    /// Instance document.
    pub input_data: Value,
    /// Expected verdict.
    pub expected_valid: bool,
}

impl From<FixtureCase> for TestCase {
    fn from(case: FixtureCase) -> Self {
        Self {
            description: case.description,
            input_data: case.data,
            expected_valid: case.valid,
        }
    }
}

/// A compiled schema and its cases.
pub struct TestSuite<S> {
    /// Suite description.
    pub description: String,
    /// Compiled schema, including any resolved remote documents.
    pub compiled_schema: S,
    /// Cases in fixture order.
    pub tests: Vec<TestCase>,
}

/// Exclusion counters for one fixture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SkipCounts {
    /// Suites skipped by the exclusion registry.
    pub suites: usize,
    /// Tests skipped by the exclusion registry.
    pub tests: usize,
    /// Fixture groups or cases skipped because they were malformed.
    pub malformed: usize,
}

/// Suites loaded from one fixture file.
pub struct SuiteFamily<S> {
    /// Fixture family id, such as `draft4`.
    pub family: String,
    /// Fixture file name, such as `type.json`.
    pub fixture: String,
    /// Loaded suites in fixture order.
    pub suites: Vec<TestSuite<S>>,
    /// Failures that must fail the run.
    pub failures: Vec<LoadFailure>,
    /// Exclusion and malformed-input counters.
    pub skipped: SkipCounts,
}

impl<S> SuiteFamily<S> {
    /// Creates an empty family for a fixture file.
    #[must_use]
    pub fn empty(family: &str, fixture: &str) -> Self {
        Self {
            family: family.to_string(),
            fixture: fixture.to_string(),
            suites: Vec::new(),
            failures: Vec::new(),
            skipped: SkipCounts::default(),
        }
    }

    /// Returns the number of loaded cases across all suites.
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.suites.iter().map(|suite| suite.tests.len()).sum()
    }
}

impl<S> Drop for SuiteFamily<S> {
    fn drop(&mut self) {
        // Release suites newest-first.
        while self.suites.pop().is_some() {}
    }
}
