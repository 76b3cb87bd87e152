// crates/schema-conformance/src/validator.rs
// ============================================================================
// Module: Suite Validator
// Description: Resettable validator bound to one compiled suite schema.
// Purpose: Run test cases one at a time with bounded error bookkeeping.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A [`SuiteValidator`] is built once per suite. Before every case the runner
//! calls [`SuiteValidator::reset`], which clears the error details retained
//! from the previous case and releases the validation region, so each verdict
//! depends only on the current document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::engine::SchemaEngine;
use crate::region::MemoryRegion;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Validator for the cases of a single suite.
pub struct SuiteValidator<'a, E: SchemaEngine> {
    /// Engine under test.
    engine: &'a E,
    /// Compiled suite schema; owned by the suite.
    schema: &'a E::Schema,
    /// Region bounding retained error details.
    region: MemoryRegion,
    /// Error details from the last accepted document.
    errors: Vec<String>,
    /// Error details that did not fit in the region.
    omitted: usize,
}

impl<'a, E: SchemaEngine> SuiteValidator<'a, E> {
    /// Creates a validator with a fresh validation region.
    #[must_use]
    pub const fn new(engine: &'a E, schema: &'a E::Schema, region_bytes: usize) -> Self {
        Self {
            engine,
            schema,
            region: MemoryRegion::new("validation", region_bytes),
            errors: Vec::new(),
            omitted: 0,
        }
    }

    /// Clears all state left by earlier documents.
    pub fn reset(&mut self) {
        self.errors.clear();
        self.omitted = 0;
        self.region.reset();
    }

    /// Validates `document` and returns the verdict.
    pub fn accept(&mut self, document: &Value) -> bool {
        let evaluation = self.engine.evaluate(self.schema, document);
        for error in evaluation.errors {
            if self.region.charge(error.len()).is_ok() {
                self.errors.push(error);
            } else {
                self.omitted += 1;
            }
        }
        evaluation.valid
    }

    /// Returns the error details retained for the last document.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Returns how many error details exceeded the validation region.
    #[must_use]
    pub const fn omitted_errors(&self) -> usize {
        self.omitted
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
