//! Retry exhaustion error types.

/// The remote system kept answering 422 until the retry ceiling was hit.
///
/// # Examples
///
/// ```
/// use airtable_error::RetryExhaustedError;
///
/// let err = RetryExhaustedError::new("https://api.airtable.com/v0/app/tbl", 20);
/// assert!(format!("{}", err).contains("https://api.airtable.com/v0/app/tbl"));
/// assert_eq!(err.retries, 20);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Retry Exhausted: hit max retries ({}) when attempting {} at line {} in {}",
    retries,
    url,
    line,
    file
)]
pub struct RetryExhaustedError {
    /// URL of the request that never succeeded
    pub url: String,
    /// Number of retries performed before giving up
    pub retries: u32,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl RetryExhaustedError {
    /// Create a new RetryExhaustedError at the current location.
    #[track_caller]
    pub fn new(url: impl Into<String>, retries: u32) -> Self {
        let location = std::panic::Location::caller();
        Self {
            url: url.into(),
            retries,
            line: location.line(),
            file: location.file(),
        }
    }
}
