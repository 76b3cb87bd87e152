// crates/schema-conformance/src/resolver.rs
// ============================================================================
// Module: Remote Reference Resolver
// Description: Maps local-registry URIs onto remote fixture files.
// Purpose: Serve `$ref` targets without network access.
// Dependencies: jsonschema, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Remote fixtures of the JSON Schema Test Suite are addressed as
//! `http://localhost:1234/<path>[#fragment]`. The resolver strips the
//! registry prefix and the fragment, loads `<remotes root><path>` through the
//! [`FileLocator`], and hands the parsed document to the engine, which folds
//! it into the compiled schema graph. Any other host is refused before the
//! filesystem is touched.
//!
//! One resolver serves every reference made while compiling one suite. It is
//! cheap to clone; clones share the same region and document cache.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use jsonschema::Retrieve;
use jsonschema::Uri;
use serde_json::Value;
use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticKind;
use crate::diagnostics::DiagnosticSink;
use crate::diagnostics::Severity;
use crate::locator::FileLocator;
use crate::locator::LocateError;
use crate::region::MemoryRegion;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// URI prefix of the simulated schema registry.
pub const DEFAULT_REMOTE_PREFIX: &str = "http://localhost:1234/";

/// Fragment delimiter stripped before file lookup.
const FRAGMENT_DELIMITER: char = '#';

// ============================================================================
// SECTION: Types
// ============================================================================

/// Remote reference resolution failures.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The URI does not start with the local registry prefix.
    #[error("external reference {uri} not supported")]
    UnsupportedHost {
        /// Rejected URI.
        uri: String,
    },
    /// The mapped fixture could not be located or read.
    #[error("remote reference {uri} unavailable: {source}")]
    Locate {
        /// Referenced URI.
        uri: String,
        /// Locator failure.
        #[source]
        source: LocateError,
    },
    /// The mapped fixture is not valid JSON.
    #[error("remote fixture {path} has parse error: {message}")]
    Parse {
        /// Referenced URI.
        uri: String,
        /// Fixture path.
        path: String,
        /// Parser error text.
        message: String,
    },
}

impl ResolveError {
    /// Returns true for failures that must abort the suite compilation.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Locate {
                source: LocateError::Region { .. },
                ..
            }
        )
    }

    /// Returns the diagnostic classification and severity for this failure.
    const fn classify(&self) -> (DiagnosticKind, Severity) {
        match self {
            Self::UnsupportedHost {
                ..
            } => (DiagnosticKind::UnsupportedRemoteHost, Severity::Warning),
            Self::Locate {
                source, ..
            } => match source {
                LocateError::NotFound {
                    ..
                } => (DiagnosticKind::RemoteNotFound, Severity::Warning),
                LocateError::Io {
                    ..
                } => (DiagnosticKind::FixtureUnreadable, Severity::Warning),
                LocateError::PathTooLong {
                    ..
                } => (DiagnosticKind::PathTooLong, Severity::Warning),
                LocateError::Region {
                    ..
                } => (DiagnosticKind::RegionExhausted, Severity::Fatal),
            },
            Self::Parse {
                ..
            } => (DiagnosticKind::RemoteParseError, Severity::Warning),
        }
    }
}

/// Settings shared by every resolver built for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// URI prefix of the local registry, ending in `/`.
    pub remote_prefix: String,
    /// Fixture-relative directory holding remote documents, ending in `/`.
    pub remotes_root: String,
    /// Capacity of the per-suite remote document region.
    pub region_bytes: usize,
}

/// Shared resolver state.
struct ResolverState {
    /// Fixture lookup.
    locator: Arc<FileLocator>,
    /// Resolution settings.
    settings: ResolverSettings,
    /// Region charged by every remote document loaded for the suite.
    region: MemoryRegion,
    /// Diagnostic sink.
    sink: Arc<dyn DiagnosticSink>,
    /// Parsed documents keyed by fixture path.
    documents: Mutex<BTreeMap<String, Value>>,
    /// First fatal failure observed, if any.
    fatal: Mutex<Option<ResolveError>>,
}

/// Resolver for references that leave the containing document.
#[derive(Clone)]
pub struct RemoteReferenceResolver {
    /// Shared state; clones resolve against the same cache and region.
    state: Arc<ResolverState>,
}

impl RemoteReferenceResolver {
    /// Creates a resolver with a fresh region and empty cache.
    #[must_use]
    pub fn new(
        locator: Arc<FileLocator>,
        settings: ResolverSettings,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let region = MemoryRegion::new("remote", settings.region_bytes);
        Self {
            state: Arc::new(ResolverState {
                locator,
                settings,
                region,
                sink,
                documents: Mutex::new(BTreeMap::new()),
                fatal: Mutex::new(None),
            }),
        }
    }

    /// Maps a registry URI to its fixture-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnsupportedHost`] when the URI is outside the
    /// local registry.
    pub fn remote_path(&self, uri: &str) -> Result<String, ResolveError> {
        let settings = &self.state.settings;
        let Some(rest) = uri.strip_prefix(settings.remote_prefix.as_str()) else {
            return Err(ResolveError::UnsupportedHost {
                uri: uri.to_string(),
            });
        };
        let document = rest.split(FRAGMENT_DELIMITER).next().unwrap_or_default();
        Ok(format!("{}{document}", settings.remotes_root))
    }

    /// Resolves a URI to its parsed document, or `None` after logging why not.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> Option<Value> {
        self.resolve_reporting(uri).ok()
    }

    /// Returns the first fatal failure seen by this resolver.
    #[must_use]
    pub fn fatal_error(&self) -> Option<ResolveError> {
        self.state.fatal.lock().ok().and_then(|fatal| fatal.clone())
    }

    /// Returns the number of distinct remote documents loaded.
    #[must_use]
    pub fn loaded_documents(&self) -> usize {
        self.state.documents.lock().map(|documents| documents.len()).unwrap_or_default()
    }

    /// Resolves a URI and records a diagnostic on failure.
    fn resolve_reporting(&self, uri: &str) -> Result<Value, ResolveError> {
        self.load(uri).inspect_err(|err| self.report(uri, err))
    }

    /// Loads and parses the fixture mapped from `uri`.
    fn load(&self, uri: &str) -> Result<Value, ResolveError> {
        let path = self.remote_path(uri)?;
        if let Ok(documents) = self.state.documents.lock()
            && let Some(document) = documents.get(&path)
        {
            return Ok(document.clone());
        }
        let fixture = self.state.locator.locate(&path, &self.state.region).map_err(|source| {
            ResolveError::Locate {
                uri: uri.to_string(),
                source,
            }
        })?;
        let document: Value =
            serde_json::from_slice(&fixture.bytes).map_err(|err| ResolveError::Parse {
                uri: uri.to_string(),
                path: path.clone(),
                message: err.to_string(),
            })?;
        if let Ok(mut documents) = self.state.documents.lock() {
            documents.insert(path, document.clone());
        }
        Ok(document)
    }

    /// Records a failure diagnostic and remembers fatal failures.
    fn report(&self, uri: &str, err: &ResolveError) {
        let (kind, severity) = err.classify();
        self.state.sink.record(&Diagnostic::new(kind, severity, uri, err.to_string()));
        if err.is_fatal()
            && let Ok(mut fatal) = self.state.fatal.lock()
            && fatal.is_none()
        {
            *fatal = Some(err.clone());
        }
    }
}

impl Retrieve for RemoteReferenceResolver {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        self.resolve_reporting(uri.as_str()).map_err(Into::into)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
