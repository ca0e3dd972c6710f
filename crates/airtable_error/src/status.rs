//! Unexpected HTTP status error types.

/// A response arrived, but its status is not acceptable for the operation.
///
/// Reads require exactly 200. Writes only raise this when strict write
/// checking is enabled on the client.
///
/// # Examples
///
/// ```
/// use airtable_error::UnexpectedStatusError;
///
/// let err = UnexpectedStatusError::new("get_records", 404, "NOT_FOUND");
/// assert_eq!(err.status, 404);
/// assert!(format!("{}", err).contains("get_records"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Invalid StatusCode {} from {}: {} at line {} in {}",
    status,
    operation,
    body,
    line,
    file
)]
pub struct UnexpectedStatusError {
    /// Operation that received the status
    pub operation: &'static str,
    /// HTTP status code
    pub status: u16,
    /// Response body, kept for diagnosis
    pub body: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl UnexpectedStatusError {
    /// Create a new UnexpectedStatusError at the current location.
    #[track_caller]
    pub fn new(operation: &'static str, status: u16, body: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            operation,
            status,
            body: body.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
