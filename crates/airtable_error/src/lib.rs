//! Error types for the Airtable client workspace.
//!
//! Every error condition follows the `ErrorKind` + wrapper struct pattern:
//! - leaf errors carry the source location where they were raised
//! - all constructors use `#[track_caller]` for automatic location capture
//! - [`AirtableError`] boxes an [`AirtableErrorKind`] so results stay small
//!
//! # Taxonomy
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | [`ConfigError`] | credentials or settings are missing or invalid |
//! | [`TransportError`] | the request never produced an HTTP response |
//! | [`RetryExhaustedError`] | the remote kept answering 422 past the retry ceiling |
//! | [`UnexpectedStatusError`] | a response status is not acceptable for the operation |
//! | [`SerializationError`] | a payload could not be encoded or decoded |
//!
//! # Examples
//!
//! ```
//! use airtable_error::{AirtableResult, ConfigError};
//!
//! fn load_key() -> AirtableResult<String> {
//!     Err(ConfigError::new("AIRTABLE_API_KEY is empty"))?
//! }
//!
//! assert!(load_key().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod retry;
mod serialization;
mod status;
mod transport;

pub use config::ConfigError;
pub use error::{AirtableError, AirtableErrorKind, AirtableResult};
pub use retry::RetryExhaustedError;
pub use serialization::SerializationError;
pub use status::UnexpectedStatusError;
pub use transport::TransportError;
