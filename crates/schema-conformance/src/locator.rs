// crates/schema-conformance/src/locator.rs
// ============================================================================
// Module: Fixture File Locator
// Description: Multi-prefix lookup for on-disk conformance fixtures.
// Purpose: Find fixtures from any of the usual build working directories.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The harness may be launched from the repository root or from a build
//! output directory. [`FileLocator`] tries a fixed, ordered list of prefixes
//! and returns the first readable regular file found. Reads are bounded by the
//! caller's [`MemoryRegion`]; nothing is cached, so every call re-reads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::region::MemoryRegion;
use crate::region::RegionError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default search prefixes, nearest first.
pub const DEFAULT_SEARCH_PREFIXES: [&str; 5] = ["", "bin/", "../bin/", "../../bin/", "../../../bin/"];

/// Default maximum length of a composed `prefix + relative` path.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Fixture contents and the path they were read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFixture {
    /// Path of the file that matched.
    pub path: PathBuf,
    /// Full file contents.
    pub bytes: Vec<u8>,
}

/// Fixture lookup failures.
#[derive(Debug, Clone, Error)]
pub enum LocateError {
    /// No prefix yielded a regular file.
    #[error("fixture {relative} not found under any search prefix")]
    NotFound {
        /// Path requested by the caller.
        relative: String,
    },
    /// A composed candidate path exceeded the configured maximum.
    #[error("fixture path {path} is {length} bytes (max {max})")]
    PathTooLong {
        /// Offending candidate path.
        path: String,
        /// Candidate length in bytes.
        length: usize,
        /// Configured maximum.
        max: usize,
    },
    /// The fixture did not fit in the caller's region.
    #[error("fixture {path} does not fit: {source}")]
    Region {
        /// Path of the oversized file.
        path: PathBuf,
        /// Region accounting failure.
        #[source]
        source: RegionError,
    },
    /// The matched file could not be read.
    #[error("fixture {path} unreadable: {message}")]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error text.
        message: String,
    },
}

/// Ordered multi-prefix fixture lookup.
///
/// # Invariants
/// - Prefixes are tried in declaration order; the first regular file wins.
#[derive(Debug, Clone)]
pub struct FileLocator {
    /// Directory the prefixes are relative to.
    anchor: PathBuf,
    /// Search prefixes, nearest first.
    prefixes: Vec<String>,
    /// Maximum composed path length in bytes.
    max_path_length: usize,
}

impl FileLocator {
    /// Creates a locator rooted at `anchor`.
    #[must_use]
    pub fn new(anchor: impl Into<PathBuf>, prefixes: Vec<String>, max_path_length: usize) -> Self {
        Self {
            anchor: anchor.into(),
            prefixes,
            max_path_length,
        }
    }

    /// Creates a locator rooted at the process working directory with the
    /// default prefixes.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            PathBuf::new(),
            DEFAULT_SEARCH_PREFIXES.iter().map(|prefix| (*prefix).to_string()).collect(),
            DEFAULT_MAX_PATH_LENGTH,
        )
    }

    /// Returns the search prefixes in lookup order.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Returns every candidate path for `relative` that fits the length
    /// limit, nearest first. Overlong candidates are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::PathTooLong`] when no composed path fits the
    /// configured maximum.
    pub fn candidates(&self, relative: &str) -> Result<Vec<PathBuf>, LocateError> {
        let mut fitting = Vec::with_capacity(self.prefixes.len());
        let mut too_long = None;
        for prefix in &self.prefixes {
            let composed = format!("{prefix}{relative}");
            if composed.len() > self.max_path_length {
                too_long.get_or_insert(LocateError::PathTooLong {
                    length: composed.len(),
                    path: composed,
                    max: self.max_path_length,
                });
                continue;
            }
            fitting.push(self.anchor.join(composed));
        }
        match too_long {
            Some(err) if fitting.is_empty() => Err(err),
            _ => Ok(fitting),
        }
    }

    /// Reads the first readable regular file for `relative` into `region`.
    ///
    /// A matching file that cannot be opened or read does not end the
    /// lookup; the next prefix is tried.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::NotFound`] when no prefix matches,
    /// [`LocateError::Io`] when every match was unreadable, and
    /// [`LocateError::Region`] when the match does not fit in the region.
    pub fn locate(
        &self,
        relative: &str,
        region: &MemoryRegion,
    ) -> Result<LocatedFixture, LocateError> {
        let mut unreadable = None;
        for candidate in self.candidates(relative)? {
            let Ok(metadata) = fs::metadata(&candidate) else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            match read_into_region(&candidate, metadata.len(), region) {
                Ok(bytes) => {
                    return Ok(LocatedFixture {
                        path: candidate,
                        bytes,
                    });
                }
                Err(err @ LocateError::Io { .. }) => {
                    unreadable.get_or_insert(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(unreadable.unwrap_or_else(|| LocateError::NotFound {
            relative: relative.to_string(),
        }))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a file while enforcing the region's remaining capacity.
fn read_into_region(
    path: &Path,
    length: u64,
    region: &MemoryRegion,
) -> Result<Vec<u8>, LocateError> {
    let io_error = |err: std::io::Error| LocateError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let file = File::open(path).map_err(io_error)?;
    let remaining = region.remaining();
    let limit = u64::try_from(remaining.saturating_add(1)).unwrap_or(u64::MAX);
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf).map_err(io_error)?;
    if buf.len() > remaining {
        let requested = usize::try_from(length).unwrap_or(usize::MAX).max(buf.len());
        return Err(LocateError::Region {
            path: path.to_path_buf(),
            source: RegionError::Exhausted {
                label: region.label(),
                requested,
                used: region.used(),
                capacity: region.capacity(),
            },
        });
    }
    region.charge(buf.len()).map_err(|source| LocateError::Region {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(buf)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
