//! Aggregate command implementation
//!
//! Builds the aggregation configuration in one of two modes and hands it to
//! the library orchestrator:
//!
//! - **Declarative**: `--config` (or `COMPONENT_GENERATOR_CONFIG`) names a
//!   configuration file. `--name`, `--title`, `--doc-version`, `--local` and
//!   `--base-directory` refine what it declares.
//! - **Imperative**: without a configuration file, `--name`, `--title` and
//!   `--doc-version` are all required and sources come from `--local`.
//!
//! The schema version is `--file-version` if given, else the configuration's
//! `metadata.oscal-version`, else the built-in default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::debug;

use component_generator::config::{self, Configuration, LocalSource};
use component_generator::error::Error;
use component_generator::output::{OutputConfig, Status};
use component_generator::phases::{self, FailurePolicy, Outcome, OutputMode, RunOptions};
use component_generator::source::SourceResolver;
use component_generator::suggestions;
use component_generator::version::{SchemaVersion, VersionRegistry};

/// Arguments for the aggregate command
#[derive(Args, Debug, Default)]
pub struct AggregateArgs {
    /// Path to the configuration file
    #[arg(short, long, value_name = "PATH", env = "COMPONENT_GENERATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the aggregate to stdout instead of writing the named file
    #[arg(short, long)]
    pub stdout: bool,

    /// OSCAL schema version of the sources and the output (e.g. 1.0.4, v1-1-1)
    #[arg(short = 'v', long = "file-version", value_name = "VERSION")]
    pub file_version: Option<String>,

    /// Skip sources that fail to download or parse instead of aborting
    #[arg(long)]
    pub lenient: bool,

    /// Output file name
    #[arg(long, value_name = "FILE")]
    pub name: Option<String>,

    /// Title of the aggregated document
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Version of the aggregated document itself
    #[arg(long = "doc-version", value_name = "VERSION")]
    pub doc_version: Option<String>,

    /// Local component definition to include (repeatable)
    #[arg(long = "local", value_name = "PATH")]
    pub locals: Vec<String>,

    /// Directory local sources are resolved against
    #[arg(long, value_name = "DIR")]
    pub base_directory: Option<String>,
}

/// Execute the aggregate command
pub fn execute(args: AggregateArgs, output: OutputConfig) -> Result<()> {
    let configuration = build_configuration(&args)?;
    let version = resolve_version(args.file_version.as_deref(), &configuration)?;
    debug!("Using OSCAL schema version {}", version);

    let options = RunOptions {
        version,
        policy: if args.lenient {
            FailurePolicy::Lenient
        } else {
            FailurePolicy::Strict
        },
        output: if args.stdout {
            OutputMode::Stdout
        } else {
            OutputMode::File(PathBuf::from(&configuration.name))
        },
    };

    let resolver = SourceResolver::new(configuration.base_directory());
    let report = match phases::execute(&configuration, &options, &resolver) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", output.status_line(Status::Failed, "Aggregation failed"));
            return Err(e.into());
        }
    };

    for skipped in &report.skipped {
        eprintln!(
            "{}",
            output.status_line(Status::Skipped, &format!("{}: {}", skipped.label, skipped.reason))
        );
    }

    match report.outcome {
        Outcome::Printed { rendered } => print!("{rendered}"),
        Outcome::Written { path } => eprintln!(
            "{}",
            output.status_line(
                Status::Written,
                &format!(
                    "Wrote {} ({} component(s))",
                    path.display(),
                    report.component_count
                )
            )
        ),
        Outcome::Skipped { path } => eprintln!(
            "{}",
            output.status_line(
                Status::Unchanged,
                &format!("{} is up to date", path.display())
            )
        ),
    }

    Ok(())
}

/// Loads the configuration file, or assembles one from flags.
fn build_configuration(args: &AggregateArgs) -> Result<Configuration> {
    let mut configuration = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(suggestions::config_not_found(path));
            }
            config::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => {
            let missing: Vec<&str> = [
                ("name", args.name.is_none()),
                ("title", args.title.is_none()),
                ("doc-version", args.doc_version.is_none()),
            ]
            .into_iter()
            .filter_map(|(flag, absent)| absent.then_some(flag))
            .collect();
            if !missing.is_empty() {
                return Err(suggestions::missing_imperative_flags(&missing));
            }
            Configuration::default()
        }
    };

    if let Some(name) = &args.name {
        configuration.name = name.clone();
    }
    if let Some(title) = &args.title {
        configuration.set_metadata("title", title.as_str());
    }
    if let Some(doc_version) = &args.doc_version {
        configuration.set_metadata("version", doc_version.as_str());
    }
    if let Some(base_directory) = &args.base_directory {
        configuration.base_directory = base_directory.clone();
    }
    configuration
        .components
        .locals
        .extend(args.locals.iter().map(|name| LocalSource { name: name.clone() }));

    Ok(configuration)
}

/// Picks the run's schema version: flag, then configured metadata, then the
/// default.
fn resolve_version(flag: Option<&str>, configuration: &Configuration) -> Result<SchemaVersion> {
    let registry = VersionRegistry::builtin();
    let requested = flag
        .or_else(|| configuration.metadata_str("oscal-version"))
        .unwrap_or_default();

    registry.normalize(requested).map_err(|e| {
        if matches!(
            e,
            Error::InvalidVersionFormat { .. } | Error::UnsupportedVersion { .. }
        ) {
            suggestions::unsupported_version(requested, &e)
        } else {
            e.into()
        }
    })
}
