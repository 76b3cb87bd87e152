// crates/schema-conformance/src/exclusion.rs
// ============================================================================
// Module: Exclusion Registry
// Description: Exact-match skip lists for acknowledged engine gaps.
// Purpose: Keep documented incompatibilities out of conformance failures.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Upstream fixture descriptions are stable, so exclusions are literal string
//! lookups and never patterns. A suite is keyed by its description; a test is
//! keyed by `"<suite>, <test>"`.

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suites skipped by the standard registry.
pub const EXCLUDED_SUITES: &[&str] = &[
    "remote ref, containing refs itself",
    "change resolution scope",
    // Benchmark-compatibility exclusions.
    "uniqueItems validation",
    "valid definition",
    "invalid definition",
];

/// Tests skipped by the standard registry, keyed by [`exclusion_key`].
pub const EXCLUDED_TESTS: &[&str] = &[
    "invalid definition, invalid definition schema",
    "maxLength validation, two supplementary Unicode code points is long enough",
    "minLength validation, one supplementary Unicode code point is not long enough",
    "heterogeneous enum validation, something else is invalid",
];

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Builds the compound test exclusion key.
#[must_use]
pub fn exclusion_key(suite_description: &str, test_description: &str) -> String {
    format!("{suite_description}, {test_description}")
}

/// Exact-match suite and test skip lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionRegistry {
    /// Excluded suite descriptions.
    suites: &'static [&'static str],
    /// Excluded compound test keys.
    tests: &'static [&'static str],
}

impl Default for ExclusionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl ExclusionRegistry {
    /// Creates a registry over custom lists.
    #[must_use]
    pub const fn new(suites: &'static [&'static str], tests: &'static [&'static str]) -> Self {
        Self {
            suites,
            tests,
        }
    }

    /// Returns the registry of known engine gaps.
    #[must_use]
    pub const fn standard() -> Self {
        Self::new(EXCLUDED_SUITES, EXCLUDED_TESTS)
    }

    /// Returns a registry that excludes nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(&[], &[])
    }

    /// Returns true if the whole suite is skipped.
    #[must_use]
    pub fn is_excluded_suite(&self, suite_description: &str) -> bool {
        self.suites.contains(&suite_description)
    }

    /// Returns true if one test of a suite is skipped.
    #[must_use]
    pub fn is_excluded_test(&self, suite_description: &str, test_description: &str) -> bool {
        let key = exclusion_key(suite_description, test_description);
        self.tests.contains(&key.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn standard_registry_excludes_documented_suites() {
        let registry = ExclusionRegistry::standard();
        assert!(registry.is_excluded_suite("remote ref, containing refs itself"));
        assert!(registry.is_excluded_suite("change resolution scope"));
        assert!(!registry.is_excluded_suite("type"));
        assert!(!registry.is_excluded_suite("remote ref"));
    }

    #[test]
    fn test_exclusion_uses_compound_key() {
        let registry = ExclusionRegistry::standard();
        assert!(registry.is_excluded_test(
            "maxLength validation",
            "two supplementary Unicode code points is long enough"
        ));
        assert!(!registry.is_excluded_test("maxLength validation", "shorter is valid"));
        assert!(!registry.is_excluded_test(
            "maxLength validation, two supplementary",
            "Unicode code points is long enough"
        ));
    }

    #[test]
    fn lookups_are_literal_not_patterns() {
        let registry = ExclusionRegistry::standard();
        assert!(!registry.is_excluded_suite("uniqueItems validation "));
        assert!(!registry.is_excluded_suite("UNIQUEITEMS VALIDATION"));
        assert!(!registry.is_excluded_suite("uniqueItems"));
        assert!(!registry.is_excluded_suite(".*"));
    }

    #[test]
    fn empty_registry_excludes_nothing() {
        let registry = ExclusionRegistry::empty();
        for suite in EXCLUDED_SUITES {
            assert!(!registry.is_excluded_suite(suite));
        }
    }

    proptest! {
        #[test]
        fn unlisted_descriptions_are_never_excluded(suite in ".{0,48}", test in ".{0,48}") {
            let registry = ExclusionRegistry::standard();
            prop_assert_eq!(registry.is_excluded_suite(&suite), EXCLUDED_SUITES.contains(&suite.as_str()));
            let key = exclusion_key(&suite, &test);
            prop_assert_eq!(
                registry.is_excluded_test(&suite, &test),
                EXCLUDED_TESTS.contains(&key.as_str())
            );
        }
    }
}
