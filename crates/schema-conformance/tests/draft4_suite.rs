//! Draft-4 conformance against a checked-out JSON Schema Test Suite.
// crates/schema-conformance/tests/draft4_suite.rs
// =============================================================================
// Module: Draft-4 Suite Tests
// Description: One test per draft-4 fixture file of the upstream corpus.
// Purpose: Gate the engine on the real corpus when it is present.
// =============================================================================
//
// The corpus is looked up as `jsonschema/tests/draft4/<file>` under the
// default search prefixes, anchored at this crate's manifest directory. The
// per-fixture tests are ignored by default; run them with
// `cargo test -- --ignored` after checking the corpus out. An absent fixture
// fails its test.

mod common;

use std::path::PathBuf;
use std::sync::Arc;

use common::TestResult;
use schema_conformance::ConformanceHarness;
use schema_conformance::DRAFT4_FIXTURES;
use schema_conformance::DiagnosticKind;
use schema_conformance::HarnessConfig;
use schema_conformance::MemoryDiagnosticSink;
use schema_conformance::config::FamilyConfig;

// ---------------------------------------------------------------------------
// Shared harness
// ---------------------------------------------------------------------------

fn run_fixture(file: &str) -> TestResult {
    let mut config = HarnessConfig::default();
    config.fixtures.anchor = Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
    config.families = vec![FamilyConfig {
        id: "draft4".to_string(),
        fixtures: vec![file.to_string()],
    }];
    let sink = Arc::new(MemoryDiagnosticSink::new());
    let harness = ConformanceHarness::new(config, sink.clone()).map_err(|err| err.to_string())?;
    let report = harness.run();

    if !sink.events_of(DiagnosticKind::FixtureNotFound).is_empty() {
        return Err(format!("fixture {file} not found under jsonschema/tests/draft4"));
    }
    if report.is_success() { Ok(()) } else { Err(report.to_string()) }
}

#[test]
fn roster_matches_default_config() {
    let config = HarnessConfig::default();
    assert_eq!(config.families[0].fixtures.len(), DRAFT4_FIXTURES.len());
}

// ---------------------------------------------------------------------------
// Macro: one #[test] per fixture file
// ---------------------------------------------------------------------------

macro_rules! suite_test {
    ($name:ident, $file:literal) => {
        #[test]
        #[ignore = "requires a JSON-Schema-Test-Suite checkout under jsonschema/"]
        fn $name() -> TestResult {
            run_fixture($file)
        }
    };
}

suite_test!(draft4_additional_items, "additionalItems.json");
suite_test!(draft4_additional_properties, "additionalProperties.json");
suite_test!(draft4_all_of, "allOf.json");
suite_test!(draft4_any_of, "anyOf.json");
suite_test!(draft4_default, "default.json");
suite_test!(draft4_definitions, "definitions.json");
suite_test!(draft4_dependencies, "dependencies.json");
suite_test!(draft4_enum, "enum.json");
suite_test!(draft4_items, "items.json");
suite_test!(draft4_maximum, "maximum.json");
suite_test!(draft4_max_items, "maxItems.json");
suite_test!(draft4_max_length, "maxLength.json");
suite_test!(draft4_max_properties, "maxProperties.json");
suite_test!(draft4_minimum, "minimum.json");
suite_test!(draft4_min_items, "minItems.json");
suite_test!(draft4_min_length, "minLength.json");
suite_test!(draft4_min_properties, "minProperties.json");
suite_test!(draft4_multiple_of, "multipleOf.json");
suite_test!(draft4_not, "not.json");
suite_test!(draft4_one_of, "oneOf.json");
suite_test!(draft4_pattern, "pattern.json");
suite_test!(draft4_pattern_properties, "patternProperties.json");
suite_test!(draft4_properties, "properties.json");
suite_test!(draft4_ref, "ref.json");
suite_test!(draft4_ref_remote, "refRemote.json");
suite_test!(draft4_required, "required.json");
suite_test!(draft4_type, "type.json");
suite_test!(draft4_unique_items, "uniqueItems.json");
