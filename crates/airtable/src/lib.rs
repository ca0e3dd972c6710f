//! Airtable - rate-limited record client
//!
//! Create, read and update the records of Airtable tables without thinking
//! about the service's limits:
//!
//! - **Authentication**: bearer token attached to every request
//! - **Rate Limiting**: at most 10 requests per second, shared by every clone of a client
//! - **Retry**: 422 responses are resent with exponential backoff (200ms x10, capped at 5 minutes)
//! - **Batching**: updates are split into requests of at most 10 records
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use airtable::{AirtableClient, Fields};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AirtableClient::from_env()?;
//!
//!     let mut fields = Fields::new();
//!     fields.insert("Name".to_string(), "Ada".to_string());
//!     client.create_records("appXYZ", "People", vec![fields]).await?;
//!
//!     for record in client.get_records("appXYZ", "People", "{Name} = 'Ada'").await? {
//!         println!("{}: {:?}", record.id(), record.fields());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `airtable_error` - Error types
//! - `airtable_core` - Records, targets, credentials, batching, configuration, telemetry
//! - `airtable_rate_limit` - Token issuance and the 422 retry state machine
//! - `airtable_client` - Request executor and record operations
//!
//! This crate re-exports everything for convenience and hosts the `airtable`
//! command-line tool.

pub mod cli;
pub mod observability;

pub use airtable_client::*;
pub use airtable_core::*;
pub use airtable_error::*;
pub use airtable_rate_limit::*;
