// crates/schema-conformance/src/harness.rs
// ============================================================================
// Module: Conformance Harness
// Description: Wires config, locator, loader, and runner into one invocation.
// Purpose: Run every configured fixture file, one at a time, into a report.
// Dependencies: jsonschema (via engine)
// ============================================================================

//! ## Overview
//! [`ConformanceHarness`] validates its configuration up front, resolves one
//! engine per fixture family, and then loads and runs fixture files strictly
//! in order. Each fixture's suites are dropped before the next file is read,
//! so at most one fixture file's suites are alive at a time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::ConfigError;
use crate::config::DiagnosticSinkKind;
use crate::config::DiagnosticsConfig;
use crate::config::HarnessConfig;
use crate::diagnostics::DiagnosticSink;
use crate::diagnostics::FileDiagnosticSink;
use crate::diagnostics::NoopDiagnosticSink;
use crate::diagnostics::StderrDiagnosticSink;
use crate::engine::JsonSchemaEngine;
use crate::exclusion::ExclusionRegistry;
use crate::loader::LoaderSettings;
use crate::loader::SuiteLoader;
use crate::locator::FileLocator;
use crate::report::HarnessReport;
use crate::runner::ConformanceRunner;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Harness construction errors.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The diagnostic sink could not be opened.
    #[error("diagnostic sink error: {0}")]
    Sink(String),
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// One resolved fixture family.
struct FamilyPlan {
    /// Family id.
    id: String,
    /// Engine pinned to the family's draft.
    engine: JsonSchemaEngine,
    /// Fixture files in run order.
    fixtures: Vec<String>,
}

/// Runs configured fixture families against the jsonschema engine.
pub struct ConformanceHarness {
    /// Resolved families in run order.
    families: Vec<FamilyPlan>,
    /// Fixture lookup shared by loaders and resolvers.
    locator: Arc<FileLocator>,
    /// Skip lists.
    exclusions: ExclusionRegistry,
    /// Loader settings.
    settings: LoaderSettings,
    /// Capacity of each suite's validation region.
    validation_region_bytes: usize,
    /// Diagnostic sink.
    sink: Arc<dyn DiagnosticSink>,
}

impl ConformanceHarness {
    /// Creates a harness from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the configuration is invalid.
    pub fn new(config: HarnessConfig, sink: Arc<dyn DiagnosticSink>) -> Result<Self, HarnessError> {
        config.validate()?;
        let mut families = Vec::with_capacity(config.families.len());
        for family in config.families {
            let engine = JsonSchemaEngine::for_family(&family.id)
                .map_err(|err| ConfigError::Invalid(err.to_string()))?;
            families.push(FamilyPlan {
                id: family.id,
                engine,
                fixtures: family.fixtures,
            });
        }
        let anchor = config.fixtures.anchor.unwrap_or_default();
        let locator = FileLocator::new(
            anchor,
            config.fixtures.search_prefixes,
            config.limits.max_path_length,
        );
        Ok(Self {
            families,
            locator: Arc::new(locator),
            exclusions: ExclusionRegistry::standard(),
            settings: LoaderSettings {
                suite_root: config.fixtures.suite_root,
                remote_prefix: config.fixtures.remote_prefix,
                region_bytes: config.limits.region_bytes,
            },
            validation_region_bytes: config.limits.validation_region_bytes,
            sink,
        })
    }

    /// Creates a harness whose sink is built from the config's diagnostics
    /// section.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the config is invalid or the sink cannot
    /// be opened.
    pub fn from_config(config: HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let sink = build_sink(&config.diagnostics)?;
        Self::new(config, sink)
    }

    /// Replaces the exclusion registry.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: ExclusionRegistry) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Loads and runs every configured fixture file in order.
    #[must_use]
    pub fn run(&self) -> HarnessReport {
        let mut report = HarnessReport::default();
        for plan in &self.families {
            let loader = SuiteLoader::new(
                &plan.engine,
                Arc::clone(&self.locator),
                self.exclusions,
                self.settings.clone(),
                Arc::clone(&self.sink),
            );
            let runner = ConformanceRunner::new(
                &plan.engine,
                self.validation_region_bytes,
                Arc::clone(&self.sink),
            );
            for fixture in &plan.fixtures {
                let family = loader.load(&plan.id, fixture);
                report.runs.push(runner.run(&family));
            }
        }
        report
    }
}

/// Builds the diagnostic sink named by the configuration.
///
/// # Errors
///
/// Returns [`HarnessError::Sink`] when the file sink cannot be opened.
pub fn build_sink(config: &DiagnosticsConfig) -> Result<Arc<dyn DiagnosticSink>, HarnessError> {
    match config.sink {
        DiagnosticSinkKind::Stderr => Ok(Arc::new(StderrDiagnosticSink)),
        DiagnosticSinkKind::None => Ok(Arc::new(NoopDiagnosticSink)),
        DiagnosticSinkKind::File => {
            let path = config.path.clone().unwrap_or_else(|| PathBuf::from("conformance.jsonl"));
            let sink = FileDiagnosticSink::new(&path)
                .map_err(|err| HarnessError::Sink(format!("{}: {err}", path.display())))?;
            Ok(Arc::new(sink))
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
