//! # Schema Version Selection
//!
//! This module decides which OSCAL schema revision a run reads and writes.
//! The version is computed once from user input (or the built-in default) and
//! is immutable for the rest of the run: every decode and encode uses it.
//!
//! ## Normalization
//!
//! Users may spell the same version several ways. `normalize` accepts:
//!
//! - an empty string, which selects [`DEFAULT_VERSION`];
//! - an optional leading `v` (`v1.0.4`);
//! - dashes instead of dots (`1-0-4`).
//!
//! After rewriting, the string must be exactly three numeric groups, and it
//! must be registered in the [`VersionRegistry`] table.
//!
//! ## Registry
//!
//! The registry maps each normalized version string to a [`SchemaVersion`].
//! Each `SchemaVersion` in turn names the [`ModelFamily`] whose Rust types
//! represent documents of that revision.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// The version used when the user does not ask for one.
pub const DEFAULT_VERSION: SchemaVersion = SchemaVersion::V1_0_4;

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("version pattern is valid"));

/// A supported OSCAL schema revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaVersion {
    V1_0_4,
    V1_0_5,
    V1_0_6,
    V1_1_0,
    V1_1_1,
}

/// The set of Rust model types used to represent a schema revision.
///
/// Revisions within a family share a document structure; they differ only in
/// constraints this tool does not enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// OSCAL 1.0.x, see [`crate::schema::v1_0`].
    V1_0,
    /// OSCAL 1.1.x, see [`crate::schema::v1_1`].
    V1_1,
}

impl SchemaVersion {
    /// Every supported revision, oldest first.
    pub const ALL: [SchemaVersion; 5] = [
        SchemaVersion::V1_0_4,
        SchemaVersion::V1_0_5,
        SchemaVersion::V1_0_6,
        SchemaVersion::V1_1_0,
        SchemaVersion::V1_1_1,
    ];

    /// The normalized, dot-separated version string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1_0_4 => "1.0.4",
            SchemaVersion::V1_0_5 => "1.0.5",
            SchemaVersion::V1_0_6 => "1.0.6",
            SchemaVersion::V1_1_0 => "1.1.0",
            SchemaVersion::V1_1_1 => "1.1.1",
        }
    }

    pub fn family(&self) -> ModelFamily {
        match self {
            SchemaVersion::V1_0_4 | SchemaVersion::V1_0_5 | SchemaVersion::V1_0_6 => {
                ModelFamily::V1_0
            }
            SchemaVersion::V1_1_0 | SchemaVersion::V1_1_1 => ModelFamily::V1_1,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        DEFAULT_VERSION
    }
}

/// Table of supported versions keyed by their normalized spelling.
#[derive(Debug, Clone)]
pub struct VersionRegistry {
    entries: BTreeMap<&'static str, SchemaVersion>,
    default: SchemaVersion,
}

impl VersionRegistry {
    /// Builds the registry of every revision this crate has models for.
    pub fn builtin() -> Self {
        Self::with_versions(&SchemaVersion::ALL, DEFAULT_VERSION)
    }

    /// Builds a registry restricted to `versions`.
    pub fn with_versions(versions: &[SchemaVersion], default: SchemaVersion) -> Self {
        let entries = versions.iter().map(|v| (v.as_str(), *v)).collect();
        Self { entries, default }
    }

    /// Comma-separated list of registered versions, for error messages.
    pub fn supported(&self) -> String {
        self.entries.keys().copied().collect::<Vec<_>>().join(", ")
    }

    /// Normalizes a user-supplied version and looks it up.
    pub fn normalize(&self, input: &str) -> Result<SchemaVersion> {
        if input.is_empty() {
            return Ok(self.default);
        }

        let formatted = format_user_version(input);
        if !VERSION_PATTERN.is_match(&formatted) {
            return Err(Error::InvalidVersionFormat {
                input: input.to_string(),
            });
        }

        self.entries
            .get(formatted.as_str())
            .copied()
            .ok_or_else(|| Error::UnsupportedVersion {
                version: formatted,
                supported: self.supported(),
            })
    }
}

impl Default for VersionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Normalizes `input` against the built-in registry.
pub fn normalize(input: &str) -> Result<SchemaVersion> {
    VersionRegistry::builtin().normalize(input)
}

fn format_user_version(input: &str) -> String {
    input.strip_prefix('v').unwrap_or(input).replace('-', ".")
}
