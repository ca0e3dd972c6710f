//! Client construction.

use crate::{AirtableClient, AuthenticatedRequestExecutor, ReqwestTransport, Transport};
use airtable_core::{AirtableConfig, ClientCredentials, NoopTelemetry, Telemetry};
use airtable_error::{AirtableResult, ConfigError};
use airtable_rate_limit::{RateLimiter, RetryPolicy};
use std::sync::Arc;
use tracing::debug;

/// Builder for [`AirtableClient`].
///
/// Credentials are required. Everything else falls back to the values of
/// [`AirtableConfig::default`], a fresh [`ReqwestTransport`] and
/// [`NoopTelemetry`].
///
/// # Example
///
/// ```rust,ignore
/// use airtable_client::AirtableClient;
/// use airtable_core::{ClientCredentials, LogTelemetry};
/// use std::sync::Arc;
///
/// let client = AirtableClient::builder()
///     .credentials(ClientCredentials::from_env()?)
///     .telemetry(Arc::new(LogTelemetry))
///     .strict_writes(true)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct AirtableClientBuilder {
    credentials: Option<ClientCredentials>,
    config: AirtableConfig,
    limiter: Option<RateLimiter>,
    retry: Option<RetryPolicy>,
    transport: Option<Arc<dyn Transport>>,
    telemetry: Option<Arc<dyn Telemetry>>,
}

impl AirtableClientBuilder {
    /// Start from default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// API key and base URL.
    pub fn credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Rate, retry, batch and strictness settings.
    pub fn config(mut self, config: AirtableConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing limiter instead of building one from the config.
    pub fn rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Override the retry policy from the config.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Send requests through `transport` instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Metrics sink.
    pub fn telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Treat non-2xx write responses as errors.
    pub fn strict_writes(mut self, strict: bool) -> Self {
        self.config.strict_writes = strict;
        self
    }

    /// Records per update request.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch.size = size;
        self
    }

    /// Validate settings and construct every collaborator.
    ///
    /// No request is sent.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when credentials are missing, the base
    /// URL does not parse, or a setting is out of range.
    pub fn build(self) -> AirtableResult<AirtableClient> {
        let credentials = self
            .credentials
            .ok_or_else(|| ConfigError::new("Client credentials are required"))?;
        self.config.validate()?;

        let limiter = match self.limiter {
            Some(limiter) => limiter,
            None => RateLimiter::from_settings(&self.config.rate_limit)?,
        };
        let retry = match self.retry {
            Some(retry) => retry,
            None => RetryPolicy::from_settings(&self.config.retry)?,
        };
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let telemetry = self
            .telemetry
            .unwrap_or_else(|| Arc::new(NoopTelemetry));

        debug!(
            base_url = credentials.base_url(),
            rate = limiter.rate(),
            max_retries = retry.max_retries(),
            batch_size = self.config.batch.size,
            strict_writes = self.config.strict_writes,
            "Building Airtable client"
        );

        let executor =
            AuthenticatedRequestExecutor::new(credentials, limiter, retry, transport, telemetry);
        AirtableClient::from_parts(executor, self.config.batch.size, self.config.strict_writes)
    }
}
