//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the aggregation
//! configuration file, and the logic for parsing and validating it.
//!
//! ## Format
//!
//! ```yaml
//! name: oscal-component.yaml
//! metadata:
//!   title: Platform Components
//!   version: "1.0.0"
//!   oscal-version: 1.0.4
//! base-directory: ./components/
//! components:
//!   local:
//!     - name: istio/component.yaml
//!   remote:
//!     - git: https://github.com/org/repo@v1.2.0
//!       path: oscal-component.yaml
//! ```
//!
//! - `name` is the output file the aggregate is written to.
//! - `metadata` is an open map copied into the aggregate. It must contain
//!   `title` and `version`; `oscal-version` is filled in from the run's schema
//!   version when absent.
//! - Local sources are resolved against `base-directory`.
//! - Remote sources must pin a ref with `<repo-url>@<ref>`.
//!
//! ## Validation
//!
//! [`Configuration::validate`] catches every configuration-class error (a
//! missing name, title or version, a remote without a ref, a remote on a host
//! with no known raw-file convention) before any source is resolved.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::source;

/// Metadata keys every aggregate must carry.
pub const REQUIRED_METADATA: [&str; 2] = ["title", "version"];

/// The complete aggregation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    /// Output file the aggregate is written to.
    #[serde(default)]
    pub name: String,
    /// Open metadata map copied into the aggregate.
    #[serde(default)]
    pub metadata: Mapping,
    /// Directory local sources are resolved against.
    #[serde(default)]
    pub base_directory: String,
    #[serde(default)]
    pub components: Sources,
}

/// Declared sources, in the order they are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sources {
    #[serde(default, rename = "local")]
    pub locals: Vec<LocalSource>,
    #[serde(default, rename = "remote")]
    pub remotes: Vec<RemoteSource>,
}

/// A component definition on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSource {
    /// Path relative to `base-directory`, or absolute.
    pub name: String,
}

/// A component definition in a remote git repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSource {
    /// Repository URL with a pinned ref: `<repo-url>@<ref>`.
    pub git: String,
    /// Path of the document inside the repository.
    pub path: String,
}

impl RemoteSource {
    /// Splits `git` into `(repository, ref)` at the last `@`.
    ///
    /// Splitting at the last `@` keeps SSH-style `git@host` prefixes intact.
    pub fn split_ref(&self) -> Result<(&str, &str)> {
        match self.git.rsplit_once('@') {
            Some((repository, git_ref)) if !repository.is_empty() && !git_ref.is_empty() => {
                Ok((repository, git_ref))
            }
            _ => Err(Error::RefSyntax {
                git: self.git.clone(),
            }),
        }
    }
}

/// A borrowed view over either kind of source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    Local(&'a LocalSource),
    Remote(&'a RemoteSource),
}

impl Source<'_> {
    /// Human-readable label used in logs and error messages.
    pub fn label(&self) -> String {
        match self {
            Source::Local(local) => local.name.clone(),
            Source::Remote(remote) => format!("{} ({})", remote.git, remote.path),
        }
    }
}

impl Configuration {
    /// All sources in merge order: locals as declared, then remotes as
    /// declared.
    pub fn sources(&self) -> impl Iterator<Item = Source<'_>> {
        self.components
            .locals
            .iter()
            .map(Source::Local)
            .chain(self.components.remotes.iter().map(Source::Remote))
    }

    pub fn source_count(&self) -> usize {
        self.components.locals.len() + self.components.remotes.len()
    }

    pub fn base_directory(&self) -> PathBuf {
        PathBuf::from(&self.base_directory)
    }

    /// Returns a metadata value if it is a string.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Sets a metadata entry, replacing any previous value.
    pub fn set_metadata(&mut self, key: &str, value: impl Into<String>) {
        self.metadata
            .insert(Value::String(key.to_string()), Value::String(value.into()));
    }

    /// Checks every configuration-class invariant.
    ///
    /// `require_name` is set when the aggregate will be written to a file,
    /// which needs `name` as its destination.
    pub fn validate(&self, require_name: bool) -> Result<()> {
        if require_name && self.name.trim().is_empty() {
            return Err(Error::Config {
                message: "'name' is required to write the aggregated document".to_string(),
                hint: Some("Set 'name' in the configuration, pass --name, or use --stdout".to_string()),
            });
        }

        let missing: Vec<&str> = REQUIRED_METADATA
            .iter()
            .copied()
            .filter(|key| !self.metadata.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Config {
                message: format!("metadata is missing required field(s): {}", missing.join(", ")),
                hint: Some("Add them under 'metadata:' or pass --title/--doc-version".to_string()),
            });
        }

        for remote in &self.components.remotes {
            let (repository, git_ref) = remote.split_ref()?;
            source::raw_url(repository, git_ref, &remote.path)?;
        }

        Ok(())
    }
}

/// Parses a YAML configuration. `origin` names the input in error messages.
pub fn parse(yaml_content: &str, origin: &str) -> Result<Configuration> {
    if yaml_content.trim().is_empty() {
        return Ok(Configuration::default());
    }
    serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

/// Reads and parses a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Configuration> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse(&content, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
name: oscal-component.yaml
metadata:
  title: Platform Components
  version: "1.0.0"
  oscal-version: 1.0.4
base-directory: ./components/
components:
  local:
    - name: istio/component.yaml
    - name: keycloak/component.yaml
  remote:
    - git: https://github.com/org/repo@v1.2.0
      path: oscal-component.yaml
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse(FULL, "test").unwrap();
        assert_eq!(config.name, "oscal-component.yaml");
        assert_eq!(config.base_directory, "./components/");
        assert_eq!(config.metadata_str("title"), Some("Platform Components"));
        assert_eq!(config.metadata_str("oscal-version"), Some("1.0.4"));
        assert_eq!(config.components.locals.len(), 2);
        assert_eq!(config.components.remotes.len(), 1);
        assert_eq!(config.components.remotes[0].path, "oscal-component.yaml");
        config.validate(true).unwrap();
    }

    #[test]
    fn test_sources_are_locals_then_remotes() {
        let config = parse(FULL, "test").unwrap();
        let labels: Vec<String> = config.sources().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec![
                "istio/component.yaml",
                "keycloak/component.yaml",
                "https://github.com/org/repo@v1.2.0 (oscal-component.yaml)",
            ]
        );
        assert_eq!(config.source_count(), 3);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse("", "test").unwrap();
        assert!(config.name.is_empty());
        assert_eq!(config.source_count(), 0);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse("name: [unclosed", "broken.yaml");
        match result {
            Err(Error::ConfigParse { path, .. }) => assert_eq!(path, "broken.yaml"),
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }

    #[test]
    fn test_split_ref() {
        let remote = RemoteSource {
            git: "https://github.com/org/repo@v1.2.0".to_string(),
            path: "a.yaml".to_string(),
        };
        assert_eq!(
            remote.split_ref().unwrap(),
            ("https://github.com/org/repo", "v1.2.0")
        );

        let ssh = RemoteSource {
            git: "git@gitlab.com:org/repo.git@main".to_string(),
            path: "a.yaml".to_string(),
        };
        assert_eq!(ssh.split_ref().unwrap(), ("git@gitlab.com:org/repo.git", "main"));
    }

    #[test]
    fn test_split_ref_requires_at() {
        for git in ["https://github.com/org/repo", "https://github.com/org/repo@", ""] {
            let remote = RemoteSource {
                git: git.to_string(),
                path: "a.yaml".to_string(),
            };
            assert!(matches!(remote.split_ref(), Err(Error::RefSyntax { .. })));
        }
    }

    #[test]
    fn test_validate_requires_name_only_for_file_output() {
        let mut config = parse(FULL, "test").unwrap();
        config.name.clear();
        assert!(matches!(config.validate(true), Err(Error::Config { .. })));
        config.validate(false).unwrap();
    }

    #[test]
    fn test_validate_requires_title_and_version() {
        let mut config = parse(FULL, "test").unwrap();
        config.metadata.remove("title");
        config.metadata.remove("version");
        let err = config.validate(false).unwrap_err();
        let display = err.to_string();
        assert!(display.contains("title, version"), "{display}");
    }

    #[test]
    fn test_validate_rejects_remote_without_ref() {
        let yaml = r#"
name: out.yaml
metadata: { title: t, version: "1" }
components:
  remote:
    - git: https://github.com/org/repo
      path: a.yaml
"#;
        let config = parse(yaml, "test").unwrap();
        assert!(matches!(config.validate(true), Err(Error::RefSyntax { .. })));
    }

    #[test]
    fn test_validate_rejects_unknown_host() {
        let yaml = r#"
name: out.yaml
metadata: { title: t, version: "1" }
components:
  remote:
    - git: https://bitbucket.org/org/repo@main
      path: a.yaml
"#;
        let config = parse(yaml, "test").unwrap();
        assert!(matches!(
            config.validate(true),
            Err(Error::UnsupportedRemote { .. })
        ));
    }

    #[test]
    fn test_set_metadata_overrides() {
        let mut config = parse(FULL, "test").unwrap();
        config.set_metadata("title", "Override");
        assert_eq!(config.metadata_str("title"), Some("Override"));
    }

    #[test]
    fn test_from_file_missing() {
        let result = from_file("/nonexistent/config.yaml");
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }
}
