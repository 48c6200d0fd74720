//! CLI module
//!
//! Command-line interface for fetching ODM data.
//!
//! # Commands
//!
//! - `people` - Fetch people matching the given filters
//! - `organizations` (`orgs`) - Fetch organizations matching the given filters
//!
//! Rows go to stdout as JSON lines (`--format json`), an indented JSON array
//! (`--format pretty`) or a Parquet file (`--format parquet --output FILE`).

mod commands;
mod runner;

pub use commands::{Cli, Commands, FetchRequest, OutputFormat};
pub use runner::Runner;
