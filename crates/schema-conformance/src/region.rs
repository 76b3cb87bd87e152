// crates/schema-conformance/src/region.rs
// ============================================================================
// Module: Memory Regions
// Description: Byte budgets for fixture parsing and validation bookkeeping.
// Purpose: Bound per-suite memory use with caller-supplied capacities.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`MemoryRegion`] is a pre-sized byte budget. Related allocations are
//! charged against it and released together with [`MemoryRegion::reset`] or by
//! dropping the region. Exhausting a region is an error; callers must never
//! truncate input to make it fit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Fixed-capacity byte budget.
///
/// Only raw input bytes are charged. The parsed `serde_json::Value` tree and
/// the compiled schema built from those bytes live on the heap outside the
/// budget, so their footprint is bounded only indirectly by the input size.
///
/// # Invariants
/// - `used() <= capacity()` at all times.
/// - A failed [`MemoryRegion::charge`] leaves the region unchanged.
#[derive(Debug)]
pub struct MemoryRegion {
    /// Region label used in error reports.
    label: &'static str,
    /// Total capacity in bytes.
    capacity: usize,
    /// Bytes charged so far.
    used: AtomicUsize,
}

/// Region accounting failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// The charge would exceed the region capacity.
    #[error(
        "{label} region exhausted: requested {requested} bytes with {used} of {capacity} in use"
    )]
    Exhausted {
        /// Region label.
        label: &'static str,
        /// Bytes requested by the failing charge.
        requested: usize,
        /// Bytes in use before the charge.
        used: usize,
        /// Region capacity.
        capacity: usize,
    },
}

impl MemoryRegion {
    /// Creates an empty region with the given capacity.
    #[must_use]
    pub const fn new(label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            capacity,
            used: AtomicUsize::new(0),
        }
    }

    /// Returns the region label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Returns the region capacity in bytes.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the bytes charged so far.
    #[must_use]
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Acquire)
    }

    /// Returns the bytes still available.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.used())
    }

    /// Charges `bytes` against the region.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Exhausted`] when the charge does not fit.
    pub fn charge(&self, bytes: usize) -> Result<(), RegionError> {
        self.used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(bytes).filter(|total| *total <= self.capacity)
            })
            .map(|_| ())
            .map_err(|used| RegionError::Exhausted {
                label: self.label,
                requested: bytes,
                used,
                capacity: self.capacity,
            })
    }

    /// Releases everything charged to the region.
    pub fn reset(&self) {
        self.used.store(0, Ordering::Release);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
