//! # Error Handling
//!
//! This module defines the centralized error type for the `component-generator`
//! library. It uses the `thiserror` library to create a single `Error` enum
//! that covers every anticipated failure mode of an aggregation run.
//!
//! ## Error Classes
//!
//! The variants fall into a small number of classes, and the class decides how
//! the rest of the application reacts:
//!
//! - **Configuration errors** (`Config`, `ConfigParse`, `RefSyntax`,
//!   `UnsupportedRemote`): the run cannot proceed meaningfully. These are
//!   detected before any source is resolved and are never recovered.
//! - **Version errors** (`InvalidVersionFormat`, `UnsupportedVersion`): the
//!   requested schema revision is malformed or unknown. Never recovered.
//! - **Per-source errors** (`Fetch`, `Parse`): a single source could not be
//!   downloaded or decoded. These are the only errors eligible for
//!   skip-and-continue, and only under the lenient failure policy. See
//!   [`Error::is_recoverable`].
//! - **Local source errors** (`NotFound`, `Read`): a declared local file is
//!   missing or unreadable. Always fatal.
//! - **Output errors** (`Write`): the destination could not be written.
//!
//! The remaining variants wrap errors from the underlying libraries.

use thiserror::Error;

/// Main error type for component-generator operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration value is missing or invalid.
    ///
    /// This error includes the specific issue and optionally a hint about how
    /// to fix it.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The configuration file could not be parsed.
    #[error("Configuration parsing error in {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// A remote source does not pin a git ref with `@`.
    #[error("Remote git URL '{git}' must specify a git ref\n  hint: use the syntax 'https://github.com/<org>/<repo>@<git ref>'")]
    RefSyntax { git: String },

    /// A remote repository is hosted somewhere no raw-file convention is known
    /// for.
    #[error("Unsupported remote repository '{repository}'\n  hint: use a '.git' repository URL or a github.com URL")]
    UnsupportedRemote { repository: String },

    /// A version string is not three numeric groups.
    #[error("Version '{input}' is not a valid version")]
    InvalidVersionFormat { input: String },

    /// A well-formed version string that no schema revision is registered for.
    #[error("Version '{version}' is not supported (supported: {supported})")]
    UnsupportedVersion { version: String, supported: String },

    /// A local source path does not exist.
    #[error("Local source not found: {path}")]
    NotFound { path: String },

    /// A local source exists but could not be read.
    #[error("Failed to read local source {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A remote source could not be fetched.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// A source document does not decode under the selected schema version.
    #[error("Failed to parse {source_name} as an OSCAL {version} component definition: {message}")]
    Parse {
        source_name: String,
        version: String,
        message: String,
    },

    /// The output document could not be written.
    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    /// Documents of different schema versions were combined.
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` for per-source failures that the lenient policy may
    /// skip over. Every other error aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Fetch { .. } | Error::Parse { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
