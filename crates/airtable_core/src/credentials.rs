//! API credentials.

use airtable_error::{AirtableResult, ConfigError};
use tracing::debug;

/// Service endpoint used when no base URL is given.
pub const DEFAULT_BASE_URL: &str = "https://api.airtable.com/v0";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "AIRTABLE_API_KEY";

/// API key and service base URL, fixed for the lifetime of a client.
///
/// The key is never printed by `Debug`.
///
/// # Examples
///
/// ```
/// use airtable_core::ClientCredentials;
///
/// let creds = ClientCredentials::new("keySecret", "https://api.airtable.com/v0").unwrap();
/// assert_eq!(creds.bearer(), "Bearer keySecret");
/// assert!(!format!("{:?}", creds).contains("keySecret"));
///
/// assert!(ClientCredentials::new("", "https://api.airtable.com/v0").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    api_key: String,
    base_url: String,
}

impl ClientCredentials {
    /// Validate and bundle a key with a base URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the key or the base URL is empty.
    #[track_caller]
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> AirtableResult<Self> {
        let api_key = api_key.into();
        let base_url = base_url.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::new("Empty API key").into());
        }
        if base_url.trim().is_empty() {
            return Err(ConfigError::new("Empty base URL").into());
        }
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Read the key from `var`, pairing it with `base_url`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the variable is unset or empty.
    pub fn from_env_var(var: &str, base_url: impl Into<String>) -> AirtableResult<Self> {
        let key = std::env::var(var).unwrap_or_default();
        if key.trim().is_empty() {
            return Err(ConfigError::new(format!("Empty {}", var)).into());
        }
        debug!(var, "Loaded API key from environment");
        Self::new(key, base_url)
    }

    /// Read the key from `AIRTABLE_API_KEY`, using the public service URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the variable is unset or empty.
    pub fn from_env() -> AirtableResult<Self> {
        Self::from_env_var(API_KEY_ENV, DEFAULT_BASE_URL)
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Service base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
