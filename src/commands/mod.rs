//! # CLI Command Implementations
//!
//! Each subcommand of the `component-generator` tool lives in its own file
//! with:
//! - an `Args` struct, derived with `clap`, for the command's options;
//! - an `execute` function that takes the parsed `Args` and calls into the
//!   `component_generator` library.

pub mod aggregate;
pub mod completions;
