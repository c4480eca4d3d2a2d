//! Orchestrator for a complete aggregation run
//!
//! This module coordinates the phases behind one API call:
//!
//! ```text
//! validate -> collect -> aggregate -> { no existing output: write }
//!                                     { existing output: diff -> unchanged: skip
//!                                                              -> changed: write }
//! ```
//!
//! In `Stdout` mode the run stops after aggregation and returns the rendered
//! document; nothing is read from or written to disk.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::aggregate;
use super::collect::{DocumentHandler, FailurePolicy, SkippedSource};
use super::diff;
use super::write;
use crate::config::Configuration;
use crate::error::Result;
use crate::schema::{OutputFormat, SchemaDocument};
use crate::source::SourceResolver;
use crate::version::SchemaVersion;

/// Where the aggregate goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Compare against and possibly replace the file at this path.
    File(PathBuf),
    /// Render to a string for the caller to print.
    Stdout,
}

/// Per-run settings that do not come from the configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub version: SchemaVersion,
    pub policy: FailurePolicy,
    pub output: OutputMode,
}

/// What happened to the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The aggregate differed from (or there was no) previous output.
    Written { path: PathBuf },
    /// The previous output already carries the same content.
    Skipped { path: PathBuf },
    /// The rendered aggregate, for `Stdout` mode.
    Printed { rendered: String },
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: Outcome,
    pub skipped: Vec<SkippedSource>,
    pub component_count: usize,
}

/// Executes one aggregation run.
///
/// Configuration-class errors are reported before any source is resolved.
pub fn execute(
    config: &Configuration,
    options: &RunOptions,
    resolver: &SourceResolver,
) -> Result<RunReport> {
    let to_file = matches!(options.output, OutputMode::File(_));
    config.validate(to_file)?;

    info!(
        "Aggregating {} source(s) as OSCAL {}",
        config.source_count(),
        options.version
    );
    let handler = DocumentHandler::new(resolver, options.version, options.policy);
    let collection = handler.collect(config)?;

    let aggregate = aggregate::aggregate(&collection.documents, config, options.version)?;
    let component_count = aggregate.component_count();
    debug!(
        "Aggregate {} has {} component(s)",
        aggregate.uuid(),
        component_count
    );

    let outcome = match &options.output {
        OutputMode::Stdout => Outcome::Printed {
            rendered: aggregate.encode(OutputFormat::Yaml)?,
        },
        OutputMode::File(path) => write_if_changed(&aggregate, path, options.version)?,
    };

    Ok(RunReport {
        outcome,
        skipped: collection.skipped,
        component_count,
    })
}

fn write_if_changed(
    aggregate: &SchemaDocument,
    path: &Path,
    version: SchemaVersion,
) -> Result<Outcome> {
    let existing = match write::read_existing(path, version) {
        Ok(existing) => existing,
        Err(e) if e.is_recoverable() => {
            warn!("Existing output will be replaced: {}", e);
            None
        }
        Err(e) => return Err(e),
    };

    if existing.is_some_and(|existing| diff::unchanged(&existing, aggregate)) {
        info!("No changes to {}", path.display());
        return Ok(Outcome::Skipped {
            path: path.to_path_buf(),
        });
    }

    write::write_document(aggregate, path)?;
    info!("Wrote {}", path.display());
    Ok(Outcome::Written {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::error::Error;
    use crate::source::mock::MockFetcher;
    use std::fs;
    use tempfile::TempDir;

    fn component_doc(uuid: &str) -> String {
        format!(
            "component-definition:\n  uuid: src-{uuid}\n  metadata:\n    title: t\n    version: \"1\"\n    oscal-version: 1.0.4\n  components:\n    - uuid: \"{uuid}\"\n      type: software\n      title: c\n      description: d\n"
        )
    }

    fn setup(body: &str) -> (TempDir, Configuration) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.yaml"), component_doc("1")).unwrap();
        fs::write(temp_dir.path().join("b.yaml"), component_doc("2")).unwrap();
        let yaml = format!(
            "name: out.yaml\nmetadata:\n  title: Aggregate\n  version: \"1.0.0\"\nbase-directory: {}\n{}",
            temp_dir.path().display(),
            body
        );
        let config = config::parse(&yaml, "test").unwrap();
        (temp_dir, config)
    }

    fn options(output: OutputMode) -> RunOptions {
        RunOptions {
            version: SchemaVersion::V1_0_4,
            policy: FailurePolicy::Strict,
            output,
        }
    }

    const LOCALS: &str = "components:\n  local:\n    - name: a.yaml\n    - name: b.yaml\n";

    #[test]
    fn test_first_run_writes_output() {
        let (temp_dir, config) = setup(LOCALS);
        let out = temp_dir.path().join("out.yaml");
        let resolver = SourceResolver::with_fetcher(temp_dir.path(), Box::new(MockFetcher::new()));

        let report = execute(&config, &options(OutputMode::File(out.clone())), &resolver).unwrap();
        assert_eq!(report.outcome, Outcome::Written { path: out.clone() });
        assert_eq!(report.component_count, 2);

        let written = write::read_existing(&out, SchemaVersion::V1_0_4)
            .unwrap()
            .unwrap();
        assert_eq!(written.component_uuids(), vec!["1", "2"]);
    }

    #[test]
    fn test_unchanged_output_is_skipped_and_untouched() {
        let (temp_dir, config) = setup(LOCALS);
        let out = temp_dir.path().join("out.yaml");
        let resolver = SourceResolver::with_fetcher(temp_dir.path(), Box::new(MockFetcher::new()));
        let opts = options(OutputMode::File(out.clone()));

        execute(&config, &opts, &resolver).unwrap();
        let before = fs::read_to_string(&out).unwrap();

        let report = execute(&config, &opts, &resolver).unwrap();
        assert_eq!(report.outcome, Outcome::Skipped { path: out.clone() });
        assert_eq!(fs::read_to_string(&out).unwrap(), before);
    }

    #[test]
    fn test_changed_source_rewrites_output() {
        let (temp_dir, config) = setup(LOCALS);
        let out = temp_dir.path().join("out.yaml");
        let resolver = SourceResolver::with_fetcher(temp_dir.path(), Box::new(MockFetcher::new()));
        let opts = options(OutputMode::File(out.clone()));

        execute(&config, &opts, &resolver).unwrap();
        fs::write(temp_dir.path().join("b.yaml"), component_doc("3")).unwrap();

        let report = execute(&config, &opts, &resolver).unwrap();
        assert_eq!(report.outcome, Outcome::Written { path: out.clone() });
        let written = write::read_existing(&out, SchemaVersion::V1_0_4)
            .unwrap()
            .unwrap();
        assert_eq!(written.component_uuids(), vec!["1", "3"]);
    }

    #[test]
    fn test_undecodable_existing_output_is_replaced() {
        let (temp_dir, config) = setup(LOCALS);
        let out = temp_dir.path().join("out.yaml");
        fs::write(&out, "not: oscal").unwrap();
        let resolver = SourceResolver::with_fetcher(temp_dir.path(), Box::new(MockFetcher::new()));

        let report = execute(&config, &options(OutputMode::File(out.clone())), &resolver).unwrap();
        assert_eq!(report.outcome, Outcome::Written { path: out.clone() });
        assert!(fs::read_to_string(&out).unwrap().contains("component-definition"));
    }

    #[test]
    fn test_stdout_mode_renders_without_writing() {
        let (temp_dir, mut config) = setup(LOCALS);
        config.name.clear();
        let resolver = SourceResolver::with_fetcher(temp_dir.path(), Box::new(MockFetcher::new()));

        let report = execute(&config, &options(OutputMode::Stdout), &resolver).unwrap();
        match report.outcome {
            Outcome::Printed { rendered } => {
                assert!(rendered.starts_with("component-definition:"));
                assert!(rendered.contains("title: Aggregate"));
            }
            other => panic!("expected Printed, got {other:?}"),
        }
        assert!(!temp_dir.path().join("out.yaml").exists());
    }

    #[test]
    fn test_json_output_path() {
        let (temp_dir, config) = setup(LOCALS);
        let out = temp_dir.path().join("out.json");
        let resolver = SourceResolver::with_fetcher(temp_dir.path(), Box::new(MockFetcher::new()));

        execute(&config, &options(OutputMode::File(out.clone())), &resolver).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(
            value["component-definition"]["components"][1]["uuid"],
            "2"
        );
    }

    #[test]
    fn test_bad_ref_fails_before_any_fetch() {
        let (temp_dir, config) = setup(
            "components:\n  local:\n    - name: a.yaml\n  remote:\n    - git: https://github.com/org/ok@v1\n      path: x.yaml\n    - git: https://github.com/org/no-ref\n      path: y.yaml\n",
        );
        let fetcher = MockFetcher::new();
        let calls = fetcher.calls.clone();
        let resolver = SourceResolver::with_fetcher(temp_dir.path(), Box::new(fetcher));
        let out = temp_dir.path().join("out.yaml");

        let result = execute(&config, &options(OutputMode::File(out.clone())), &resolver);
        assert!(matches!(result, Err(Error::RefSyntax { .. })));
        assert!(calls.lock().unwrap().is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_name_is_config_error_for_file_output() {
        let (temp_dir, mut config) = setup(LOCALS);
        config.name.clear();
        let resolver = SourceResolver::with_fetcher(temp_dir.path(), Box::new(MockFetcher::new()));
        let out = temp_dir.path().join("out.yaml");

        let result = execute(&config, &options(OutputMode::File(out)), &resolver);
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_lenient_run_reports_skipped_sources() {
        let (temp_dir, config) = setup(
            "components:\n  local:\n    - name: a.yaml\n  remote:\n    - git: https://github.com/org/repo@v1\n      path: gone.yaml\n",
        );
        let resolver = SourceResolver::with_fetcher(temp_dir.path(), Box::new(MockFetcher::new()));
        let opts = RunOptions {
            policy: FailurePolicy::Lenient,
            ..options(OutputMode::Stdout)
        };

        let report = execute(&config, &opts, &resolver).unwrap();
        assert_eq!(report.component_count, 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].label.contains("gone.yaml"));
    }
}
