//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Airtable - read and write table records from the command line
#[derive(Parser, Debug)]
#[command(name = "airtable")]
#[command(about = "Read and write Airtable records with rate limiting, batching and 422 backoff", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file, replacing the home and working directory lookup
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where request metrics go
    #[arg(long, global = true, default_value = "none")]
    pub telemetry: TelemetrySink,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the records of a table
    Get {
        /// Base identifier
        #[arg(long)]
        base: String,

        /// Table name or identifier
        #[arg(long)]
        table: String,

        /// Filter formula, e.g. "{Status} = 'Open'"
        #[arg(long, default_value = "")]
        filter: String,

        /// Page cursor returned by a previous call
        #[arg(long)]
        offset: Option<String>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Create records from a JSON file: {"base", "table", "records": [{field: value}]}
    Create {
        /// Path to the payload file
        #[arg(long)]
        payload: PathBuf,
    },

    /// Update records from a JSON file: {"base", "table", "records": [{"id", "fields"}]}
    Update {
        /// Path to the payload file
        #[arg(long)]
        payload: PathBuf,
    },
}

/// Output format for listed records
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One block per record
    Human,
    /// The page as pretty-printed JSON
    Json,
}

/// Metrics sink selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TelemetrySink {
    /// Discard metrics
    None,
    /// Write metrics as log events
    Log,
    /// Report through the global OpenTelemetry meter
    Otel,
}
