//! Top-level error wrapper types.

use crate::{
    ConfigError, RetryExhaustedError, SerializationError, TransportError, UnexpectedStatusError,
};

/// Every failure the Airtable client can report.
///
/// # Examples
///
/// ```
/// use airtable_error::{AirtableError, AirtableErrorKind, TransportError};
///
/// let err: AirtableError = TransportError::new("dns lookup failed").into();
/// assert!(matches!(err.kind(), AirtableErrorKind::Transport(_)));
/// assert!(format!("{}", err).contains("Transport Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AirtableErrorKind {
    /// Missing or invalid credentials or settings
    #[from(ConfigError)]
    Config(ConfigError),
    /// Network level failure
    #[from(TransportError)]
    Transport(TransportError),
    /// 422 retries ran out
    #[from(RetryExhaustedError)]
    RetryExhausted(RetryExhaustedError),
    /// Status not acceptable for the operation
    #[from(UnexpectedStatusError)]
    UnexpectedStatus(UnexpectedStatusError),
    /// JSON encode/decode failure
    #[from(SerializationError)]
    Serialization(SerializationError),
}

/// Airtable error with kind discrimination.
///
/// # Examples
///
/// ```
/// use airtable_error::{AirtableResult, ConfigError};
///
/// fn might_fail() -> AirtableResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Airtable Error: {}", _0)]
pub struct AirtableError(Box<AirtableErrorKind>);

impl AirtableError {
    /// Create a new error from a kind.
    pub fn new(kind: AirtableErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AirtableErrorKind {
        &self.0
    }

    /// Status code carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self.kind() {
            AirtableErrorKind::UnexpectedStatus(e) => Some(e.status),
            // Only 422 is ever retried.
            AirtableErrorKind::RetryExhausted(_) => Some(422),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to AirtableErrorKind
impl<T> From<T> for AirtableError
where
    T: Into<AirtableErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Airtable operations.
pub type AirtableResult<T> = std::result::Result<T, AirtableError>;
