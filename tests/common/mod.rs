//! Shared test utilities for E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new()
//!     .with_config(configs::TWO_LOCALS)
//!     .with_component("a.yaml", &["1"]);
//! fixture.command_with_config().arg("aggregate").assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::component_definition;
    pub use super::TestFixture;
}

/// Configuration documents used across tests.
#[allow(dead_code)]
pub mod configs {
    /// Two local sources, written to `out.yaml`.
    pub const TWO_LOCALS: &str = r#"
name: out.yaml
metadata:
  title: Aggregated Components
  version: "1.0.0"
components:
  local:
    - name: a.yaml
    - name: b.yaml
"#;

    /// A remote source without a pinned ref.
    pub const REMOTE_WITHOUT_REF: &str = r#"
name: out.yaml
metadata:
  title: Aggregated Components
  version: "1.0.0"
components:
  remote:
    - git: https://github.com/org/repo
      path: oscal-component.yaml
"#;

    /// Metadata without a title.
    pub const MISSING_TITLE: &str = r#"
name: out.yaml
metadata:
  version: "1.0.0"
components:
  local:
    - name: a.yaml
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "name: [unclosed";
}

/// Renders a 1.0.4 component definition holding one component per UUID.
pub fn component_definition(uuids: &[&str]) -> String {
    let mut doc = String::from(
        "component-definition:\n  uuid: 8f7e6d5c-4b3a-4291-8a7b-6c5d4e3f2a1b\n  metadata:\n    title: Source\n    last-modified: \"2023-01-01T00:00:00Z\"\n    version: \"0.1.0\"\n    oscal-version: 1.0.4\n  components:\n",
    );
    for uuid in uuids {
        doc.push_str(&format!(
            "    - uuid: \"{uuid}\"\n      type: software\n      title: Component {uuid}\n      description: Component {uuid}\n"
        ));
    }
    doc
}

/// A temporary working directory with a configuration and source documents.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Writes `components.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("components.yaml", content)
    }

    /// Writes a component definition with the given component UUIDs.
    pub fn with_component(self, path: &str, uuids: &[&str]) -> Self {
        self.with_file(path, &component_definition(uuids))
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("components.yaml")
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.temp_dir.path().join(path)).expect("Failed to read file")
    }

    /// A command running in this fixture's directory with colors disabled.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("component-generator");
        cmd.current_dir(self.path())
            .env_remove("COMPONENT_GENERATOR_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }

    /// `aggregate --config components.yaml` in this fixture's directory.
    pub fn aggregate(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("aggregate").arg("--config").arg(self.config_path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configs_are_valid_yaml() {
        for config in [
            configs::TWO_LOCALS,
            configs::REMOTE_WITHOUT_REF,
            configs::MISSING_TITLE,
        ] {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
        assert!(serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML).is_err());
    }

    #[test]
    fn test_component_definition_is_valid_yaml() {
        let doc: serde_yaml::Value =
            serde_yaml::from_str(&component_definition(&["1", "2"])).unwrap();
        assert_eq!(
            doc["component-definition"]["components"]
                .as_sequence()
                .map(Vec::len),
            Some(2)
        );
    }
}
