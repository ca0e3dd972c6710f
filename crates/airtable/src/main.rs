//! Airtable CLI binary.
//!
//! Command-line access to the record client:
//! - List and filter records
//! - Create records from a JSON payload
//! - Update records from a JSON payload, in batches

use airtable::cli::{Cli, build_client, observability_config, run_command};
use airtable::observability::init_observability;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up AIRTABLE_API_KEY from a local .env when present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let observability = init_observability(&observability_config(&cli))?;

    let client = build_client(&cli)?;
    let result = run_command(&client, cli.command).await;

    observability.shutdown()?;
    result?;
    Ok(())
}
