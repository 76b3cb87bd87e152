// crates/schema-conformance/src/engine.rs
// ============================================================================
// Module: Validation Engine Seam
// Description: Engine trait and the jsonschema-backed implementation.
// Purpose: Isolate the engine under test behind parse/compile/evaluate.
// Dependencies: jsonschema, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The harness never inspects schema semantics itself. It parses documents,
//! compiles schemas with a [`RemoteReferenceResolver`], and evaluates
//! instances through [`SchemaEngine`]. [`JsonSchemaEngine`] binds the trait to
//! the `jsonschema` crate for one fixture family (draft).

// ============================================================================
// SECTION: Imports
// ============================================================================

use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use crate::resolver::RemoteReferenceResolver;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Engine failures surfaced to the harness.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Input bytes are not a JSON document.
    #[error("parse error: {0}")]
    Parse(String),
    /// The engine rejected the schema.
    #[error("schema compile error: {0}")]
    Compile(String),
    /// No draft is known for the fixture family.
    #[error("unknown fixture family: {0}")]
    UnknownFamily(String),
}

/// Result of evaluating one instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// Engine verdict.
    pub valid: bool,
    /// Error details reported by the engine when invalid.
    pub errors: Vec<String>,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Validation engine under test.
pub trait SchemaEngine {
    /// Compiled schema handle.
    type Schema;

    /// Parses raw bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Parse`] for malformed input.
    fn parse_document(&self, bytes: &[u8]) -> Result<Value, EngineError> {
        serde_json::from_slice(bytes).map_err(|err| EngineError::Parse(err.to_string()))
    }

    /// Compiles a schema document, resolving remote references with `resolver`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Compile`] when the schema cannot be compiled.
    fn compile_schema(
        &self,
        document: &Value,
        resolver: &RemoteReferenceResolver,
    ) -> Result<Self::Schema, EngineError>;

    /// Evaluates one instance against a compiled schema.
    fn evaluate(&self, schema: &Self::Schema, instance: &Value) -> Evaluation;
}

// ============================================================================
// SECTION: jsonschema Binding
// ============================================================================

/// Maps a fixture family id to its draft.
///
/// # Errors
///
/// Returns [`EngineError::UnknownFamily`] for unsupported families.
pub fn draft_for_family(family: &str) -> Result<Draft, EngineError> {
    match family {
        "draft4" => Ok(Draft::Draft4),
        "draft6" => Ok(Draft::Draft6),
        "draft7" => Ok(Draft::Draft7),
        "draft2019-09" => Ok(Draft::Draft201909),
        "draft2020-12" => Ok(Draft::Draft202012),
        other => Err(EngineError::UnknownFamily(other.to_string())),
    }
}

/// `jsonschema`-backed engine pinned to one draft.
#[derive(Debug, Clone, Copy)]
pub struct JsonSchemaEngine {
    /// Draft applied to every compiled schema.
    draft: Draft,
}

impl JsonSchemaEngine {
    /// Creates an engine for an explicit draft.
    #[must_use]
    pub const fn new(draft: Draft) -> Self {
        Self {
            draft,
        }
    }

    /// Creates an engine for a fixture family id such as `draft4`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownFamily`] for unsupported families.
    pub fn for_family(family: &str) -> Result<Self, EngineError> {
        draft_for_family(family).map(Self::new)
    }

    /// Returns the configured draft.
    #[must_use]
    pub const fn draft(&self) -> Draft {
        self.draft
    }
}

impl SchemaEngine for JsonSchemaEngine {
    type Schema = Validator;

    fn compile_schema(
        &self,
        document: &Value,
        resolver: &RemoteReferenceResolver,
    ) -> Result<Validator, EngineError> {
        jsonschema::options()
            .with_draft(self.draft)
            .with_retriever(resolver.clone())
            .build(document)
            .map_err(|err| EngineError::Compile(err.to_string()))
    }

    fn evaluate(&self, schema: &Validator, instance: &Value) -> Evaluation {
        if schema.is_valid(instance) {
            return Evaluation {
                valid: true,
                errors: Vec::new(),
            };
        }
        Evaluation {
            valid: false,
            errors: schema.iter_errors(instance).map(|err| err.to_string()).collect(),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
