//! JSON encode/decode error types.

/// Payload encoding or response decoding failure.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Serialization Error: {} at line {} in {}", message, line, file)]
pub struct SerializationError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl SerializationError {
    /// Create a new SerializationError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use airtable_error::SerializationError;
    ///
    /// let err = SerializationError::new("expected value at line 1 column 1");
    /// assert!(err.message.contains("expected value"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for SerializationError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}
