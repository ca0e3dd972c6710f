//! Airtable record client.
//!
//! [`AirtableClient`] exposes get/create/update operations on the records of a
//! (base, table) pair. Every operation funnels through one
//! [`AuthenticatedRequestExecutor`], which:
//!
//! 1. attaches `Authorization: Bearer <key>` and `Content-Type: application/json`
//! 2. waits for a rate limiter token (10 per second by default)
//! 3. dispatches over a [`Transport`]
//! 4. backs off and resends on 422, up to the retry ceiling
//!
//! Updates are split into batches of at most 10 records and sent in order.
//!
//! # Example
//!
//! ```rust,ignore
//! use airtable_client::AirtableClient;
//!
//! let client = AirtableClient::from_env()?;
//! let open = client.get_records("appXYZ", "Tasks", "{Status} = 'Open'").await?;
//! println!("{} open tasks", open.len());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod client;
mod executor;
mod transport;

pub use builder::AirtableClientBuilder;
pub use client::AirtableClient;
pub use executor::AuthenticatedRequestExecutor;
pub use transport::{HttpMethod, HttpResponse, PreparedRequest, ReqwestTransport, Transport};
