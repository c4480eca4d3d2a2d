//! # Component Generator Library
//!
//! This library aggregates OSCAL component definitions from local files and
//! remote git repositories into a single component-definition document. It
//! is designed to be used by the `component-generator` command-line tool but
//! can also be embedded in other applications.
//!
//! ## Quick Example
//!
//! ```
//! use component_generator::config;
//! use component_generator::version;
//!
//! let config_yaml = r#"
//! name: oscal-component.yaml
//! metadata:
//!   title: Platform Components
//!   version: "1.0.0"
//! components:
//!   local:
//!     - name: istio/component.yaml
//! "#;
//! let config = config::parse(config_yaml, "inline").unwrap();
//! assert_eq!(config.source_count(), 1);
//! config.validate(true).unwrap();
//!
//! let version = version::normalize("v1-0-4").unwrap();
//! assert_eq!(version.as_str(), "1.0.4");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the aggregation configuration: output name,
//!   metadata, and the declared local and remote sources.
//! - **Versions (`version`)**: normalization of user-supplied schema versions
//!   and the registry of supported revisions.
//! - **Documents (`schema`)**: typed models for each OSCAL model family and the
//!   version-tagged `SchemaDocument` codec.
//! - **Sources (`source`)**: reading local files and downloading remote files
//!   through raw-content URLs.
//! - **Phases (`phases`)**: collection, aggregation, change detection and
//!   writing, tied together by `phases::orchestrator`.
//!
//! ## Execution Flow
//!
//! 1.  **Validation**: configuration-class errors are reported before any I/O.
//! 2.  **Collection**: each source is resolved and decoded, locals first.
//! 3.  **Aggregation**: components and resources are concatenated into a new
//!     document with a fresh UUID and timestamp.
//! 4.  **Change Detection**: the aggregate is compared with the existing
//!     output, ignoring volatile fields.
//! 5.  **Output**: the file is rewritten only when something changed, or the
//!     document is rendered for standard output.

pub mod config;
pub mod error;
pub mod output;
pub mod phases;
pub mod schema;
pub mod source;
pub mod suggestions;
pub mod version;

#[cfg(test)]
mod version_proptest;
