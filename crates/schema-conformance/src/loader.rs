// crates/schema-conformance/src/loader.rs
// ============================================================================
// Module: Suite Loader
// Description: Loads fixture files into compiled test suites.
// Purpose: Turn JSON Schema Test Suite files into runnable suites.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`SuiteLoader::load`] reads `<suite root>/tests/<family>/<fixture>`,
//! filters groups and cases through the [`ExclusionRegistry`], and compiles
//! each remaining group's schema with its own [`RemoteReferenceResolver`].
//!
//! Problems stay local to the smallest unit they affect: a missing or
//! malformed file yields an empty family, a malformed group or case is
//! skipped, and a schema the engine rejects drops only that suite. Region
//! exhaustion and compile failures are also kept as [`LoadFailure`]s so the
//! run cannot pass while hiding them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;

use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticKind;
use crate::diagnostics::DiagnosticSink;
use crate::diagnostics::Severity;
use crate::engine::SchemaEngine;
use crate::exclusion::ExclusionRegistry;
use crate::exclusion::exclusion_key;
use crate::locator::FileLocator;
use crate::locator::LocateError;
use crate::model::FixtureCase;
use crate::model::FixtureGroup;
use crate::model::SuiteFamily;
use crate::model::TestCase;
use crate::model::TestSuite;
use crate::region::MemoryRegion;
use crate::report::LoadFailure;
use crate::report::LoadFailureKind;
use crate::resolver::RemoteReferenceResolver;
use crate::resolver::ResolverSettings;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Loader settings derived from the harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSettings {
    /// Fixture-relative root holding `tests/` and `remotes/`.
    pub suite_root: String,
    /// URI prefix of the local schema registry.
    pub remote_prefix: String,
    /// Capacity of each fixture and remote region.
    pub region_bytes: usize,
}

impl LoaderSettings {
    /// Returns the fixture-relative path of one fixture file.
    #[must_use]
    pub fn fixture_path(&self, family: &str, fixture: &str) -> String {
        format!("{}/tests/{family}/{fixture}", self.suite_root)
    }

    /// Returns the resolver settings for suites loaded with these settings.
    #[must_use]
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            remote_prefix: self.remote_prefix.clone(),
            remotes_root: format!("{}/remotes/", self.suite_root),
            region_bytes: self.region_bytes,
        }
    }
}

/// Loads fixture files for one engine.
pub struct SuiteLoader<'a, E: SchemaEngine> {
    /// Engine used to parse and compile.
    engine: &'a E,
    /// Fixture lookup shared with every resolver.
    locator: Arc<FileLocator>,
    /// Skip lists.
    exclusions: ExclusionRegistry,
    /// Loader settings.
    settings: LoaderSettings,
    /// Diagnostic sink.
    sink: Arc<dyn DiagnosticSink>,
}

impl<'a, E: SchemaEngine> SuiteLoader<'a, E> {
    /// Creates a loader.
    #[must_use]
    pub fn new(
        engine: &'a E,
        locator: Arc<FileLocator>,
        exclusions: ExclusionRegistry,
        settings: LoaderSettings,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            engine,
            locator,
            exclusions,
            settings,
            sink,
        }
    }

    /// Loads every non-excluded suite of one fixture file.
    #[must_use]
    pub fn load(&self, family: &str, fixture: &str) -> SuiteFamily<E::Schema> {
        let mut loaded = SuiteFamily::empty(family, fixture);
        let path = self.settings.fixture_path(family, fixture);
        let region = MemoryRegion::new("fixture", self.settings.region_bytes);

        let located = match self.locator.locate(&path, &region) {
            Ok(located) => located,
            Err(err) => {
                self.report_locate_failure(&mut loaded, &path, &err);
                return loaded;
            }
        };
        let document = match self.engine.parse_document(&located.bytes) {
            Ok(document) => document,
            Err(err) => {
                self.diagnose(
                    DiagnosticKind::FixtureParseError,
                    Severity::Warning,
                    &path,
                    format!("json test suite file {path} has parse error: {err}"),
                );
                return loaded;
            }
        };
        drop(located);

        let Value::Array(groups) = document else {
            self.diagnose(
                DiagnosticKind::FixtureParseError,
                Severity::Warning,
                &path,
                "json test suite file must be an array of groups",
            );
            return loaded;
        };

        for (index, group) in groups.into_iter().enumerate() {
            let group: FixtureGroup = match serde_json::from_value(group) {
                Ok(group) => group,
                Err(err) => {
                    loaded.skipped.malformed += 1;
                    self.diagnose(
                        DiagnosticKind::FixtureParseError,
                        Severity::Warning,
                        format!("{path}[{index}]"),
                        format!("malformed fixture group: {err}"),
                    );
                    continue;
                }
            };
            if self.exclusions.is_excluded_suite(&group.description) {
                loaded.skipped.suites += 1;
                self.diagnose(
                    DiagnosticKind::ExclusionSkip,
                    Severity::Info,
                    &group.description,
                    "suite excluded",
                );
                continue;
            }
            if let Some(suite) = self.compile_suite(&mut loaded, group) {
                loaded.suites.push(suite);
            }
        }
        loaded
    }

    /// Compiles one group and collects its non-excluded cases.
    fn compile_suite(
        &self,
        loaded: &mut SuiteFamily<E::Schema>,
        group: FixtureGroup,
    ) -> Option<TestSuite<E::Schema>> {
        let resolver = RemoteReferenceResolver::new(
            Arc::clone(&self.locator),
            self.settings.resolver_settings(),
            Arc::clone(&self.sink),
        );
        let compiled = self.engine.compile_schema(&group.schema, &resolver);
        if let Some(fatal) = resolver.fatal_error() {
            loaded.failures.push(LoadFailure {
                fixture: loaded.fixture.clone(),
                suite: Some(group.description),
                kind: LoadFailureKind::RegionExhausted,
                message: fatal.to_string(),
            });
            return None;
        }
        let compiled_schema = match compiled {
            Ok(schema) => schema,
            Err(err) => {
                self.diagnose(
                    DiagnosticKind::SchemaCompileError,
                    Severity::Error,
                    &group.description,
                    err.to_string(),
                );
                loaded.failures.push(LoadFailure {
                    fixture: loaded.fixture.clone(),
                    suite: Some(group.description),
                    kind: LoadFailureKind::SchemaCompile,
                    message: err.to_string(),
                });
                return None;
            }
        };

        let mut tests = Vec::with_capacity(group.tests.len());
        for case in group.tests {
            let case: FixtureCase = match serde_json::from_value(case) {
                Ok(case) => case,
                Err(err) => {
                    loaded.skipped.malformed += 1;
                    self.diagnose(
                        DiagnosticKind::FixtureParseError,
                        Severity::Warning,
                        &group.description,
                        format!("malformed test case: {err}"),
                    );
                    continue;
                }
            };
            if self.exclusions.is_excluded_test(&group.description, &case.description) {
                loaded.skipped.tests += 1;
                self.diagnose(
                    DiagnosticKind::ExclusionSkip,
                    Severity::Info,
                    exclusion_key(&group.description, &case.description),
                    "test excluded",
                );
                continue;
            }
            tests.push(TestCase::from(case));
        }

        Some(TestSuite {
            description: group.description,
            compiled_schema,
            tests,
        })
    }

    /// Records a fixture lookup failure.
    fn report_locate_failure(
        &self,
        loaded: &mut SuiteFamily<E::Schema>,
        path: &str,
        err: &LocateError,
    ) {
        let (kind, severity) = match err {
            LocateError::NotFound {
                ..
            } => (DiagnosticKind::FixtureNotFound, Severity::Warning),
            LocateError::PathTooLong {
                ..
            } => (DiagnosticKind::PathTooLong, Severity::Warning),
            LocateError::Io {
                ..
            } => (DiagnosticKind::FixtureUnreadable, Severity::Error),
            LocateError::Region {
                ..
            } => {
                loaded.failures.push(LoadFailure {
                    fixture: loaded.fixture.clone(),
                    suite: None,
                    kind: LoadFailureKind::RegionExhausted,
                    message: err.to_string(),
                });
                (DiagnosticKind::RegionExhausted, Severity::Fatal)
            }
        };
        self.diagnose(kind, severity, path, err.to_string());
    }

    /// Records a diagnostic.
    fn diagnose(
        &self,
        kind: DiagnosticKind,
        severity: Severity,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.sink.record(&Diagnostic::new(kind, severity, subject, message));
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
