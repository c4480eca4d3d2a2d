//! The stages of a `component-generator` aggregation run.
//!
//! ## Overview
//!
//! A run follows these stages:
//! 1. Collection - Resolve every declared source and decode it under the run's
//!    schema version (`collect`)
//! 2. Aggregation - Concatenate components and resources into a new document
//!    with fresh identity and the configured metadata (`aggregate`)
//! 3. Change Detection - Compare the aggregate against the previous output,
//!    ignoring volatile fields (`diff`)
//! 4. Writing - Atomically replace the output file when something changed
//!    (`write`)
//!
//! `orchestrator` ties the stages together and is the entry point callers use.
//!
//! Each stage depends only on the earlier stages and the foundation modules
//! (`config`, `source`, `schema`, `version`).

pub mod aggregate;
pub mod collect;
pub mod diff;
pub mod orchestrator;
pub mod write;

pub use collect::{Collection, DocumentHandler, FailurePolicy, SkippedSource};
pub use orchestrator::{execute, OutputMode, Outcome, RunOptions, RunReport};
