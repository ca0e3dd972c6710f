//! Record command handlers.

use super::commands::{Cli, Commands, OutputFormat, TelemetrySink};
use airtable_client::AirtableClient;
use airtable_core::{
    AirtableConfig, ClientCredentials, CommandPayload, LogTelemetry, NoopTelemetry,
    OtelTelemetry, RecordPage, RequestTarget, Telemetry, UpdatePayload,
};
use crate::observability::ObservabilityConfig;
use airtable_error::{AirtableResult, ConfigError, SerializationError};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Log and metrics settings selected on the command line.
///
/// `--telemetry otel` installs a meter provider so the OpenTelemetry sink
/// has somewhere to report.
pub fn observability_config(cli: &Cli) -> ObservabilityConfig {
    let mut config = ObservabilityConfig::new()
        .with_json_logs(cli.json_logs)
        .with_otel_metrics(cli.telemetry == TelemetrySink::Otel);
    if cli.verbose {
        config = config.with_log_level("debug");
    }
    config
}

/// Build a client from the configuration selected on the command line.
///
/// The API key is read from the variable named by `api_key_env`.
///
/// # Errors
///
/// Returns a configuration error when the configuration does not load or
/// the key is missing.
pub fn build_client(cli: &Cli) -> AirtableResult<AirtableClient> {
    let config = match &cli.config {
        Some(path) => AirtableConfig::from_file(path)?,
        None => AirtableConfig::load()?,
    };
    let credentials = ClientCredentials::from_env_var(&config.api_key_env, &config.base_url)?;
    let telemetry: Arc<dyn Telemetry> = match cli.telemetry {
        TelemetrySink::None => Arc::new(NoopTelemetry),
        TelemetrySink::Log => Arc::new(LogTelemetry),
        TelemetrySink::Otel => Arc::new(OtelTelemetry::default()),
    };

    AirtableClient::builder()
        .credentials(credentials)
        .config(config)
        .telemetry(telemetry)
        .build()
}

/// Read and decode a JSON payload file.
///
/// # Errors
///
/// - Configuration error when the file cannot be read
/// - Serialization error when it does not decode as `T`
pub fn load_json<T: DeserializeOwned>(path: &Path) -> AirtableResult<T> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(format!("Failed to read payload {}: {}", path.display(), e))
    })?;
    let payload = serde_json::from_str(&text).map_err(SerializationError::from)?;
    Ok(payload)
}

/// Execute one command against `client`, printing results to stdout.
///
/// # Errors
///
/// Propagates payload loading and client errors.
pub async fn run_command(client: &AirtableClient, command: Commands) -> AirtableResult<()> {
    match command {
        Commands::Get {
            base,
            table,
            filter,
            offset,
            format,
        } => {
            let target = RequestTarget::new(base, table).with_filter(filter);
            let page = client.get_records_page(&target, offset.as_deref()).await?;
            print_page(&page, format)
        }

        Commands::Create { payload } => {
            let payload: CommandPayload = load_json(&payload)?;
            let count = payload.records.len();
            client
                .create_records_at(&payload.target(), payload.records)
                .await?;
            info!(count, "Created records");
            println!("Sent {} new records to {}/{}", count, payload.base, payload.table);
            Ok(())
        }

        Commands::Update { payload } => {
            let payload: UpdatePayload = load_json(&payload)?;
            let pending = payload.pending_count();
            if pending > 0 {
                warn!(pending, "Update payload contains records without an id");
            }
            let count = payload.records.len();
            client
                .update_records_at(&payload.target(), payload.records)
                .await?;
            info!(count, "Updated records");
            println!("Sent {} record updates to {}/{}", count, payload.base, payload.table);
            Ok(())
        }
    }
}

fn print_page(page: &RecordPage, format: OutputFormat) -> AirtableResult<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(page).map_err(SerializationError::from)?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            println!("{:-<80}", "");
            for record in page.records() {
                println!("{} ({})", record.id(), record.created_time());
                for (name, value) in record.fields() {
                    println!("  {}: {}", name, value);
                }
                println!("{:-<80}", "");
            }
            println!("Total: {} records", page.records().len());
            if let Some(offset) = page.offset() {
                println!("More available, pass --offset {}", offset);
            }
        }
    }
    Ok(())
}
