//! Core data types for the Airtable client.
//!
//! This crate holds everything the request pipeline passes around but that
//! does not itself talk to the network:
//!
//! - [`Record`] / [`RecordPage`] - the wire shapes of rows and list responses
//! - [`RequestTarget`] - the (base, table, filter) triple addressing a collection
//! - [`ClientCredentials`] - API key plus service base URL
//! - [`BatchPlan`] - order-preserving chunking for bulk writes
//! - [`AirtableConfig`] - layered TOML configuration
//! - [`Telemetry`] - the metrics sink interface and its stock implementations

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod config;
mod credentials;
mod payload;
mod record;
mod target;
mod telemetry;

pub use batch::{BatchPlan, MAX_BATCH_SIZE};
pub use config::{AirtableConfig, BatchSettings, RateLimitSettings, RetrySettings};
pub use credentials::{API_KEY_ENV, ClientCredentials, DEFAULT_BASE_URL};
pub use payload::{CommandPayload, UpdatePayload};
pub use record::{Fields, Record, RecordBuilder, RecordBuilderError, RecordPage, RecordsPayload};
pub use target::{FILTER_PARAM, OFFSET_PARAM, RequestTarget};
pub use telemetry::{LogTelemetry, NoopTelemetry, OtelTelemetry, Tags, Telemetry};
