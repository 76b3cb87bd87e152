// crates/schema-conformance/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Configuration loading and validation for conformance runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every field has a default matching the JSON Schema Test Suite layout, so an
//! empty file (or [`HarnessConfig::default`]) runs the draft-4 roster from the
//! usual build directories. No environment variables are consulted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::engine::draft_for_family;
use crate::locator::DEFAULT_MAX_PATH_LENGTH;
use crate::locator::DEFAULT_SEARCH_PREFIXES;
use crate::resolver::DEFAULT_REMOTE_PREFIX;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length accepted for configured paths.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default fixture and remote region capacity in bytes.
pub(crate) const DEFAULT_REGION_BYTES: usize = 1024 * 1024;
/// Default validation region capacity in bytes.
pub(crate) const DEFAULT_VALIDATION_REGION_BYTES: usize = 64 * 1024;
/// Largest region capacity accepted.
pub(crate) const MAX_REGION_BYTES: usize = 64 * 1024 * 1024;
/// Default directory holding `tests/` and `remotes/`.
pub(crate) const DEFAULT_SUITE_ROOT: &str = "jsonschema";

/// Draft-4 fixture files run by default.
pub const DRAFT4_FIXTURES: &[&str] = &[
    "additionalItems.json",
    "additionalProperties.json",
    "allOf.json",
    "anyOf.json",
    "default.json",
    "definitions.json",
    "dependencies.json",
    "enum.json",
    "items.json",
    "maximum.json",
    "maxItems.json",
    "maxLength.json",
    "maxProperties.json",
    "minimum.json",
    "minItems.json",
    "minLength.json",
    "minProperties.json",
    "multipleOf.json",
    "not.json",
    "oneOf.json",
    "pattern.json",
    "patternProperties.json",
    "properties.json",
    "ref.json",
    "refRemote.json",
    "required.json",
    "type.json",
    "uniqueItems.json",
];

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Conformance harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Fixture lookup configuration.
    #[serde(default)]
    pub fixtures: FixturesConfig,
    /// Memory and path limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Diagnostic sink configuration.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Fixture families to run, in order.
    #[serde(default = "default_families")]
    pub families: Vec<FamilyConfig>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fixtures: FixturesConfig::default(),
            limits: LimitsConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            families: default_families(),
        }
    }
}

impl HarnessConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fixtures.validate()?;
        self.limits.validate()?;
        self.diagnostics.validate()?;
        if self.families.is_empty() {
            return Err(ConfigError::Invalid("at least one family is required".to_string()));
        }
        for family in &self.families {
            family.validate()?;
        }
        Ok(())
    }
}

/// Fixture lookup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixturesConfig {
    /// Directory that prefixes resolve against; the working directory if unset.
    #[serde(default)]
    pub anchor: Option<PathBuf>,
    /// Directory holding `tests/` and `remotes/`, relative to each prefix.
    #[serde(default = "default_suite_root")]
    pub suite_root: String,
    /// Search prefixes, nearest first.
    #[serde(default = "default_search_prefixes")]
    pub search_prefixes: Vec<String>,
    /// URI prefix of the simulated schema registry.
    #[serde(default = "default_remote_prefix")]
    pub remote_prefix: String,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            anchor: None,
            suite_root: default_suite_root(),
            search_prefixes: default_search_prefixes(),
            remote_prefix: default_remote_prefix(),
        }
    }
}

impl FixturesConfig {
    /// Validates fixture lookup settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(anchor) = &self.anchor {
            validate_path(anchor)?;
        }
        validate_relative_path("fixtures.suite_root", &self.suite_root)?;
        if self.search_prefixes.is_empty() {
            return Err(ConfigError::Invalid(
                "fixtures.search_prefixes must be non-empty".to_string(),
            ));
        }
        for prefix in &self.search_prefixes {
            if !prefix.is_empty() && !prefix.ends_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "fixtures.search_prefixes entry '{prefix}' must end with '/'"
                )));
            }
            if prefix.len() > MAX_TOTAL_PATH_LENGTH {
                return Err(ConfigError::Invalid(
                    "fixtures.search_prefixes entry exceeds max length".to_string(),
                ));
            }
        }
        let prefix = self.remote_prefix.as_str();
        if !(prefix.starts_with("http://") || prefix.starts_with("https://")) {
            return Err(ConfigError::Invalid(
                "fixtures.remote_prefix must be an http(s) uri".to_string(),
            ));
        }
        if !prefix.ends_with('/') || prefix.contains('#') {
            return Err(ConfigError::Invalid(
                "fixtures.remote_prefix must end with '/' and carry no fragment".to_string(),
            ));
        }
        Ok(())
    }
}

/// Memory and path limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Capacity of each fixture file and per-suite remote region.
    #[serde(default = "default_region_bytes")]
    pub region_bytes: usize,
    /// Capacity of each per-suite validation region.
    #[serde(default = "default_validation_region_bytes")]
    pub validation_region_bytes: usize,
    /// Maximum composed `prefix + relative` fixture path length.
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            region_bytes: DEFAULT_REGION_BYTES,
            validation_region_bytes: DEFAULT_VALIDATION_REGION_BYTES,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
        }
    }
}

impl LimitsConfig {
    /// Validates limit ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.region_bytes == 0 || self.region_bytes > MAX_REGION_BYTES {
            return Err(ConfigError::Invalid(format!(
                "limits.region_bytes must be between 1 and {MAX_REGION_BYTES}"
            )));
        }
        if self.validation_region_bytes == 0 || self.validation_region_bytes > MAX_REGION_BYTES {
            return Err(ConfigError::Invalid(format!(
                "limits.validation_region_bytes must be between 1 and {MAX_REGION_BYTES}"
            )));
        }
        if self.max_path_length == 0 || self.max_path_length > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "limits.max_path_length must be between 1 and {MAX_TOTAL_PATH_LENGTH}"
            )));
        }
        Ok(())
    }
}

/// Diagnostic sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard diagnostics.
    None,
}

/// Diagnostic sink configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: DiagnosticSinkKind,
    /// Log path for the `file` sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl DiagnosticsConfig {
    /// Validates sink settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (DiagnosticSinkKind::File, None) => Err(ConfigError::Invalid(
                "diagnostics.path is required for the file sink".to_string(),
            )),
            (DiagnosticSinkKind::File, Some(path)) => validate_path(path),
            (_, Some(_)) => Err(ConfigError::Invalid(
                "diagnostics.path is only valid for the file sink".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

/// One fixture family and the files to run from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyConfig {
    /// Family id, such as `draft4`.
    pub id: String,
    /// Fixture file names, run in order.
    pub fixtures: Vec<String>,
}

impl FamilyConfig {
    /// Validates the family id and fixture names.
    fn validate(&self) -> Result<(), ConfigError> {
        draft_for_family(&self.id).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if self.fixtures.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "family {} must list at least one fixture",
                self.id
            )));
        }
        for fixture in &self.fixtures {
            validate_fixture_name(fixture)?;
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default fixture families.
fn default_families() -> Vec<FamilyConfig> {
    vec![FamilyConfig {
        id: "draft4".to_string(),
        fixtures: DRAFT4_FIXTURES.iter().map(|fixture| (*fixture).to_string()).collect(),
    }]
}

/// Default suite root.
fn default_suite_root() -> String {
    DEFAULT_SUITE_ROOT.to_string()
}

/// Default search prefixes.
fn default_search_prefixes() -> Vec<String> {
    DEFAULT_SEARCH_PREFIXES.iter().map(|prefix| (*prefix).to_string()).collect()
}

/// Default remote registry prefix.
fn default_remote_prefix() -> String {
    DEFAULT_REMOTE_PREFIX.to_string()
}

/// Default fixture region capacity.
const fn default_region_bytes() -> usize {
    DEFAULT_REGION_BYTES
}

/// Default validation region capacity.
const fn default_validation_region_bytes() -> usize {
    DEFAULT_VALIDATION_REGION_BYTES
}

/// Default maximum fixture path length.
const fn default_max_path_length() -> usize {
    DEFAULT_MAX_PATH_LENGTH
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a non-empty relative path string.
fn validate_relative_path(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.starts_with('/') || trimmed.ends_with('/') {
        return Err(ConfigError::Invalid(format!(
            "{field} must be relative without a trailing '/'"
        )));
    }
    validate_path(Path::new(trimmed))
}

/// Validates a fixture file name: a plain `.json` name with no separators.
fn validate_fixture_name(name: &str) -> Result<(), ConfigError> {
    let plain = !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && name != ".."
        && name.len() <= MAX_PATH_COMPONENT_LENGTH;
    if !plain || !name.ends_with(".json") {
        return Err(ConfigError::Invalid(format!("fixture '{name}' must be a plain .json file name")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
