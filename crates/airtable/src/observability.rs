//! Log and metrics setup for the command-line tool.
//!
//! The library crates only emit `tracing` events and report to whatever
//! meter the host provides. This module is that host for the `airtable`
//! binary: it installs the log subscriber and, when the OpenTelemetry sink
//! is selected, a meter provider exporting to stdout.

use airtable_error::{AirtableResult, ConfigError};
use opentelemetry::global;
use opentelemetry_sdk::{Resource, metrics::SdkMeterProvider};
use std::env;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for log and metrics output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Service name for telemetry attribution
    pub service_name: String,
    /// Log level filter (e.g., "info", "debug"), used when `RUST_LOG` is unset
    pub log_level: String,
    /// Enable JSON-formatted logs for structured logging
    pub json_logs: bool,
    /// Install an OpenTelemetry meter provider with a stdout exporter
    pub otel_metrics: bool,
}

impl ObservabilityConfig {
    /// Configuration honouring `RUST_LOG`, defaulting to `info`.
    pub fn new() -> Self {
        Self {
            service_name: env!("CARGO_PKG_NAME").to_string(),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: false,
            otel_metrics: false,
        }
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }

    /// Enable the OpenTelemetry meter provider.
    pub fn with_otel_metrics(mut self, enabled: bool) -> Self {
        self.otel_metrics = enabled;
        self
    }

    /// Parsed filter directives.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the level string is not a valid filter.
    pub fn env_filter(&self) -> AirtableResult<EnvFilter> {
        EnvFilter::try_new(&self.log_level).map_err(|e| {
            ConfigError::new(format!("Invalid log filter '{}': {}", self.log_level, e)).into()
        })
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Providers installed by [`init_observability`], flushed on [`shutdown`](Self::shutdown).
#[derive(Debug, Default)]
pub struct ObservabilityGuard {
    meter_provider: Option<SdkMeterProvider>,
}

impl ObservabilityGuard {
    /// True when a meter provider was installed.
    pub fn metrics_enabled(&self) -> bool {
        self.meter_provider.is_some()
    }

    /// Export pending metrics and stop the exporter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the exporter fails to flush.
    pub fn shutdown(self) -> AirtableResult<()> {
        if let Some(provider) = self.meter_provider {
            provider
                .shutdown()
                .map_err(|e| ConfigError::new(format!("Failed to flush metrics: {}", e)))?;
        }
        Ok(())
    }
}

/// Meter provider exporting to stdout, when `config` asks for one.
pub fn meter_provider(config: &ObservabilityConfig) -> Option<SdkMeterProvider> {
    config.otel_metrics.then(|| {
        let resource = Resource::builder()
            .with_service_name(config.service_name.clone())
            .build();
        SdkMeterProvider::builder()
            .with_periodic_exporter(opentelemetry_stdout::MetricExporter::default())
            .with_resource(resource)
            .build()
    })
}

/// Install the global subscriber and, if configured, the global meter provider.
///
/// # Errors
///
/// Returns a configuration error when the filter is invalid or a subscriber
/// is already installed.
pub fn init_observability(config: &ObservabilityConfig) -> AirtableResult<ObservabilityGuard> {
    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(false).boxed()
    };

    tracing_subscriber::registry()
        .with(config.env_filter()?)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install log subscriber: {}", e)))?;

    let meter_provider = meter_provider(config);
    if let Some(provider) = &meter_provider {
        global::set_meter_provider(provider.clone());
    }

    tracing::debug!(
        level = %config.log_level,
        json = config.json_logs,
        otel_metrics = config.otel_metrics,
        "Observability initialized"
    );
    Ok(ObservabilityGuard { meter_provider })
}
