//! Command-line interface module.
//!
//! Argument definitions and command handlers for the `airtable` binary.

mod commands;
mod records;

pub use commands::{Cli, Commands, OutputFormat, TelemetrySink};
pub use records::{build_client, load_json, observability_config, run_command};
