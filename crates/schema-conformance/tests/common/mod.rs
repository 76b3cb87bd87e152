// crates/schema-conformance/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: On-disk corpus builders shared by integration tests.
// Purpose: Lay out synthetic JSON Schema Test Suite trees in temp dirs.
// Dependencies: schema-conformance, tempfile
// ============================================================================

//! ## Overview
//! Builds a miniature `jsonschema/{tests,remotes}` tree under a temporary
//! directory so harness runs exercise real file lookup and remote resolution.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use schema_conformance::HarnessConfig;
use schema_conformance::config::DiagnosticSinkKind;
use schema_conformance::config::FamilyConfig;
use tempfile::TempDir;

/// Result type used by integration tests.
pub type TestResult = Result<(), String>;

// ============================================================================
// SECTION: Corpus Builder
// ============================================================================

/// Synthetic corpus rooted in a temporary directory.
pub struct Corpus {
    /// Temporary directory owning the tree.
    dir: TempDir,
    /// Prefix under the anchor where `jsonschema/` lives.
    prefix: String,
}

impl Corpus {
    /// Creates an empty corpus placed directly under the anchor.
    pub fn new() -> Result<Self, String> {
        Self::under_prefix("")
    }

    /// Creates an empty corpus placed under `prefix` (such as `bin/`).
    pub fn under_prefix(prefix: &str) -> Result<Self, String> {
        let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
        Ok(Self {
            dir,
            prefix: prefix.to_string(),
        })
    }

    /// Returns the anchor directory the harness resolves prefixes against.
    pub fn anchor(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    /// Returns the directory holding `tests/` and `remotes/`.
    pub fn suite_root(&self) -> PathBuf {
        self.anchor().join(&self.prefix).join("jsonschema")
    }

    /// Writes a fixture file for a family.
    pub fn fixture(&self, family: &str, name: &str, body: &str) -> Result<&Self, String> {
        write(&self.suite_root().join("tests").join(family).join(name), body)?;
        Ok(self)
    }

    /// Writes a remote document under `remotes/`.
    pub fn remote(&self, relative: &str, body: &str) -> Result<&Self, String> {
        write(&self.suite_root().join("remotes").join(relative), body)?;
        Ok(self)
    }

    /// Returns a config that runs `fixtures` from `draft4` against this corpus.
    pub fn config(&self, fixtures: &[&str]) -> HarnessConfig {
        let mut config = HarnessConfig::default();
        config.fixtures.anchor = Some(self.anchor());
        config.diagnostics.sink = DiagnosticSinkKind::None;
        config.families = vec![FamilyConfig {
            id: "draft4".to_string(),
            fixtures: fixtures.iter().map(|name| (*name).to_string()).collect(),
        }];
        config
    }

    /// Returns the temp directory root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Writes a file, creating parent directories.
fn write(path: &Path, body: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    fs::write(path, body).map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Sample Fixtures
// ============================================================================

/// A `type.json` fixture with one integer suite.
pub const TYPE_FIXTURE: &str = r#"[
    {
        "description": "integer type matches integers",
        "schema": {"type": "integer"},
        "tests": [
            {"description": "an integer is an integer", "data": 1, "valid": true},
            {"description": "a float is not an integer", "data": 1.1, "valid": false},
            {"description": "a string is not an integer", "data": "foo", "valid": false}
        ]
    }
]"#;

/// A `refRemote.json` fixture referencing `integer.json` and a subschema.
pub const REF_REMOTE_FIXTURE: &str = r##"[
    {
        "description": "remote ref",
        "schema": {"$ref": "http://localhost:1234/integer.json"},
        "tests": [
            {"description": "remote ref valid", "data": 1, "valid": true},
            {"description": "remote ref invalid", "data": "a", "valid": false}
        ]
    },
    {
        "description": "fragment within remote ref",
        "schema": {"$ref": "http://localhost:1234/subSchemas.json#/integer"},
        "tests": [
            {"description": "remote fragment valid", "data": 1, "valid": true},
            {"description": "remote fragment invalid", "data": "a", "valid": false}
        ]
    }
]"##;

/// Remote `integer.json`.
pub const INTEGER_REMOTE: &str = r#"{"type": "integer"}"#;

/// Remote `subSchemas.json`.
pub const SUB_SCHEMAS_REMOTE: &str =
    r##"{"integer": {"type": "integer"}, "refToInteger": {"$ref": "#/integer"}}"##;
