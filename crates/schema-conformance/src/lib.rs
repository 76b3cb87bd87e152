// crates/schema-conformance/src/lib.rs
// ============================================================================
// Module: Schema Conformance
// Description: JSON Schema Test Suite harness for the jsonschema engine.
// Purpose: Load fixture files, run every case, and report verdict mismatches.
// Dependencies: jsonschema, serde, serde_json, thiserror, toml
// ============================================================================

//! ## Overview
//! This crate runs the JSON Schema Test Suite corpus against a validation
//! engine. Fixture files are located through ordered search prefixes, remote
//! references under the local registry URI are served from the corpus'
//! `remotes/` directory, and known-divergent suites and tests are skipped by
//! exact description match.
//! Invariants:
//! - Fixture and remote reads are charged to bounded [`MemoryRegion`]s;
//!   exhaustion fails the fixture run instead of truncating input.
//! - Each case's verdict is independent of the cases run before it.
//! - Every mismatch is reported as `"<suite> :: <test>"`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod exclusion;
pub mod harness;
pub mod loader;
pub mod locator;
pub mod model;
pub mod region;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::DRAFT4_FIXTURES;
pub use config::HarnessConfig;
pub use diagnostics::Diagnostic;
pub use diagnostics::DiagnosticKind;
pub use diagnostics::DiagnosticSink;
pub use diagnostics::MemoryDiagnosticSink;
pub use engine::JsonSchemaEngine;
pub use engine::SchemaEngine;
pub use exclusion::ExclusionRegistry;
pub use harness::ConformanceHarness;
pub use harness::HarnessError;
pub use loader::LoaderSettings;
pub use loader::SuiteLoader;
pub use locator::FileLocator;
pub use locator::LocateError;
pub use model::SuiteFamily;
pub use model::TestCase;
pub use model::TestSuite;
pub use region::MemoryRegion;
pub use report::CaseKey;
pub use report::HarnessReport;
pub use report::RunReport;
pub use resolver::RemoteReferenceResolver;
pub use runner::ConformanceRunner;
pub use validator::SuiteValidator;
