//! Harness tests against a synthetic on-disk corpus.
// crates/schema-conformance/tests/harness_corpus.rs
// =============================================================================
// Module: Harness Corpus Tests
// Description: End-to-end harness runs over temp-dir fixture trees.
// Purpose: Cover lookup, remote resolution, exclusions, and failure paths.
// =============================================================================

mod common;

use std::fs;
use std::sync::Arc;

use common::Corpus;
use common::INTEGER_REMOTE;
use common::REF_REMOTE_FIXTURE;
use common::SUB_SCHEMAS_REMOTE;
use common::TYPE_FIXTURE;
use common::TestResult;
use schema_conformance::ConformanceHarness;
use schema_conformance::DiagnosticKind;
use schema_conformance::HarnessConfig;
use schema_conformance::HarnessReport;
use schema_conformance::MemoryDiagnosticSink;
use schema_conformance::report::LoadFailureKind;

fn run(corpus: &Corpus, fixtures: &[&str]) -> Result<(HarnessReport, Arc<MemoryDiagnosticSink>), String> {
    let sink = Arc::new(MemoryDiagnosticSink::new());
    let harness = ConformanceHarness::new(corpus.config(fixtures), sink.clone())
        .map_err(|err| err.to_string())?;
    Ok((harness.run(), sink))
}

fn ensure(condition: bool, message: &str) -> TestResult {
    if condition { Ok(()) } else { Err(message.to_string()) }
}

#[test]
fn type_and_remote_fixtures_pass() -> TestResult {
    let corpus = Corpus::new()?;
    corpus
        .fixture("draft4", "type.json", TYPE_FIXTURE)?
        .fixture("draft4", "refRemote.json", REF_REMOTE_FIXTURE)?
        .remote("integer.json", INTEGER_REMOTE)?
        .remote("subSchemas.json", SUB_SCHEMAS_REMOTE)?;

    let (report, sink) = run(&corpus, &["type.json", "refRemote.json"])?;
    ensure(report.is_success(), &report.to_string())?;
    ensure(report.total_cases() == 7, "expected 3 type cases and 4 remote cases")?;
    ensure(
        sink.events_of(DiagnosticKind::SuiteSummary).len() == 3,
        "expected one summary per suite",
    )
}

#[test]
fn fixtures_are_found_under_bin_prefix() -> TestResult {
    let corpus = Corpus::under_prefix("bin/")?;
    corpus.fixture("draft4", "type.json", TYPE_FIXTURE)?;

    let (report, _) = run(&corpus, &["type.json"])?;
    ensure(report.total_cases() == 3, "fixture under bin/ was not located")?;
    ensure(report.is_success(), &report.to_string())
}

#[test]
fn excluded_suites_and_tests_are_skipped() -> TestResult {
    let corpus = Corpus::new()?;
    corpus.fixture(
        "draft4",
        "enum.json",
        r#"[
            {
                "description": "change resolution scope",
                "schema": {"$ref": "http://example.com/unreachable.json"},
                "tests": [{"description": "never run", "data": 1, "valid": true}]
            },
            {
                "description": "heterogeneous enum validation",
                "schema": {"enum": [6, "foo", [], true, {"foo": 12}]},
                "tests": [
                    {"description": "one of the enum is valid", "data": [], "valid": true},
                    {"description": "something else is invalid", "data": null, "valid": true}
                ]
            }
        ]"#,
    )?;

    let (report, sink) = run(&corpus, &["enum.json"])?;
    ensure(report.is_success(), &report.to_string())?;
    let run = &report.runs[0];
    ensure(run.outcomes.len() == 1, "only the non-excluded case should run")?;
    ensure(run.skipped.suites == 1 && run.skipped.tests == 1, "skip counters mismatch")?;
    ensure(
        sink.events_of(DiagnosticKind::ExclusionSkip).len() == 2,
        "each exclusion should be logged",
    )
}

#[test]
fn mismatches_are_keyed_by_suite_and_test() -> TestResult {
    let corpus = Corpus::new()?;
    corpus.fixture(
        "draft4",
        "maxLength.json",
        r#"[{
            "description": "maxLength validation",
            "schema": {"maxLength": 2},
            "tests": [
                {"description": "shorter is valid", "data": "f", "valid": true},
                {"description": "too long is wrongly valid", "data": "foo", "valid": true}
            ]
        }]"#,
    )?;

    let (report, sink) = run(&corpus, &["maxLength.json"])?;
    ensure(!report.is_success(), "mismatch must fail the run")?;
    let keys: Vec<String> = report.runs[0].mismatches().map(|o| o.key.to_string()).collect();
    ensure(
        keys == vec!["maxLength validation :: too long is wrongly valid".to_string()],
        &format!("unexpected mismatches: {}", keys.join(", ")),
    )?;
    ensure(sink.events_of(DiagnosticKind::CaseMismatch).len() == 1, "missing mismatch event")
}

#[test]
fn unresolvable_remote_fails_the_suite() -> TestResult {
    let corpus = Corpus::new()?;
    corpus.fixture(
        "draft4",
        "refRemote.json",
        r#"[{
            "description": "foreign host",
            "schema": {"$ref": "http://example.com/integer.json"},
            "tests": [{"description": "any", "data": 1, "valid": true}]
        }]"#,
    )?;

    let (report, sink) = run(&corpus, &["refRemote.json"])?;
    let failures = &report.runs[0].load_failures;
    ensure(failures.len() == 1, "expected one load failure")?;
    ensure(failures[0].kind == LoadFailureKind::SchemaCompile, "expected compile failure")?;
    ensure(!report.is_success(), "compile failure must fail the run")?;
    ensure(
        !sink.events_of(DiagnosticKind::UnsupportedRemoteHost).is_empty(),
        "foreign host should be diagnosed",
    )
}

#[test]
fn region_exhaustion_fails_the_fixture() -> TestResult {
    let corpus = Corpus::new()?;
    corpus.fixture("draft4", "type.json", TYPE_FIXTURE)?;
    let mut config = corpus.config(&["type.json"]);
    config.limits.region_bytes = 16;

    let harness = ConformanceHarness::new(config, Arc::new(MemoryDiagnosticSink::new()))
        .map_err(|err| err.to_string())?;
    let report = harness.run();
    let run = &report.runs[0];
    ensure(run.outcomes.is_empty(), "no cases should run from a truncated fixture")?;
    ensure(
        run.load_failures.iter().any(|f| f.kind == LoadFailureKind::RegionExhausted),
        "expected region exhaustion",
    )?;
    ensure(!report.is_success(), "exhaustion must fail the run")
}

#[test]
fn oversized_remote_fails_only_its_suite() -> TestResult {
    let corpus = Corpus::new()?;
    let padding = "x".repeat(2048);
    corpus
        .fixture(
            "draft4",
            "refRemote.json",
            r#"[
                {
                    "description": "big remote",
                    "schema": {"$ref": "http://localhost:1234/big.json"},
                    "tests": [{"description": "an integer", "data": 1, "valid": true}]
                },
                {
                    "description": "local type",
                    "schema": {"type": "integer"},
                    "tests": [{"description": "an integer", "data": 1, "valid": true}]
                }
            ]"#,
        )?
        .remote("big.json", &format!(r#"{{"type": "integer", "description": "{padding}"}}"#))?;
    let mut config = corpus.config(&["refRemote.json"]);
    config.limits.region_bytes = 1024;

    let sink = Arc::new(MemoryDiagnosticSink::new());
    let harness =
        ConformanceHarness::new(config, sink.clone()).map_err(|err| err.to_string())?;
    let report = harness.run();
    let run = &report.runs[0];
    ensure(run.load_failures.len() == 1, "expected one load failure")?;
    let failure = &run.load_failures[0];
    ensure(failure.kind == LoadFailureKind::RegionExhausted, "expected region exhaustion")?;
    ensure(failure.suite.as_deref() == Some("big remote"), "failure should name the suite")?;
    ensure(run.outcomes.len() == 1, "sibling suite should still run")?;
    ensure(run.outcomes[0].key.suite == "local type", "unexpected suite ran")?;
    ensure(run.passed() == 1, "sibling case should pass")?;
    ensure(!report.is_success(), "remote exhaustion must fail the run")?;
    ensure(
        !sink.events_of(DiagnosticKind::RegionExhausted).is_empty(),
        "exhaustion should be diagnosed",
    )
}

#[test]
fn toml_config_drives_a_run() -> TestResult {
    let corpus = Corpus::new()?;
    corpus.fixture("draft4", "type.json", TYPE_FIXTURE)?;
    let anchor = corpus.anchor();
    let config_path = corpus.root().join("conformance.toml");
    let toml = format!(
        "[fixtures]\nanchor = '{}'\n\n[diagnostics]\nsink = \"none\"\n\n\
         [[families]]\nid = \"draft4\"\nfixtures = [\"type.json\"]\n",
        anchor.display()
    );
    fs::write(&config_path, toml).map_err(|err| err.to_string())?;

    let config = HarnessConfig::load(&config_path).map_err(|err| err.to_string())?;
    let harness = ConformanceHarness::from_config(config).map_err(|err| err.to_string())?;
    let report = harness.run();
    ensure(report.total_cases() == 3, "expected the type fixture to run")?;

    let json = serde_json::to_value(&report).map_err(|err| err.to_string())?;
    ensure(json["runs"][0]["fixture"] == "type.json", "report should serialize fixture name")
}
