//! # Component Generator CLI
//!
//! This is the binary entry point for the `component-generator` command-line
//! tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Installing the logger and choosing the output style.
//! - Executing the selected command and turning library errors into
//!   user-facing messages and a non-zero exit status.
//!
//! The aggregation logic lives in the `component_generator` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
