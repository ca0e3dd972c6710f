//! Authenticated request execution with rate limiting and 422 backoff.

use crate::{HttpMethod, HttpResponse, PreparedRequest, Transport};
use airtable_core::{ClientCredentials, Tags, Telemetry};
use airtable_error::{AirtableResult, RetryExhaustedError};
use airtable_rate_limit::{RETRY_STATUS, RateLimiter, RetryPolicy, RetryState};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const JSON: &str = "application/json";

/// Sends requests with credentials attached, one rate limiter token per attempt.
///
/// Only a 422 response is retried. Every other status, success or not, is
/// handed back without an error; callers decide what a 404 or a 500 means
/// for their operation. Errors are limited to transport failures and retry
/// exhaustion.
///
/// Holds no per-call state. Clones share the limiter, transport and telemetry
/// sink, and may be used from several tasks at once.
#[derive(Debug, Clone)]
pub struct AuthenticatedRequestExecutor {
    credentials: Arc<ClientCredentials>,
    limiter: RateLimiter,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
    telemetry: Arc<dyn Telemetry>,
}

impl AuthenticatedRequestExecutor {
    /// Assemble an executor from its collaborators.
    pub fn new(
        credentials: ClientCredentials,
        limiter: RateLimiter,
        retry: RetryPolicy,
        transport: Arc<dyn Transport>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        Self {
            credentials: Arc::new(credentials),
            limiter,
            retry,
            transport,
            telemetry,
        }
    }

    /// Credentials attached to every request.
    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Retry policy applied to every request.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Shared rate limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Send `body` to `url`, retrying on 422.
    ///
    /// # Errors
    ///
    /// - Transport error when no response could be obtained (never retried)
    /// - Retry exhausted error naming `url` once the retry ceiling is hit
    #[instrument(skip(self, method, body), fields(method = %method))]
    pub async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> AirtableResult<HttpResponse> {
        let request = PreparedRequest::new(method, url, body)
            .with_header(CONTENT_TYPE, JSON)
            .with_header(AUTHORIZATION, self.credentials.bearer());

        let mut machine = self.retry.start();
        loop {
            let response = self.attempt(&request, machine.attempts() + 1).await?;

            match machine.on_status(response.status) {
                RetryState::Backoff { retry, delay } => {
                    self.backoff(&request, retry, delay).await;
                    machine.on_backoff_elapsed();
                }
                RetryState::Exhausted { retries } => {
                    error!(retries, url, "Hit max retries");
                    return Err(RetryExhaustedError::new(url, retries).into());
                }
                _ => return Ok(response),
            }
        }
    }

    async fn attempt(&self, request: &PreparedRequest, attempt: u32) -> AirtableResult<HttpResponse> {
        info!(attempt, "Making request for {}", request.url());
        self.limiter.acquire().await;

        let started = Instant::now();
        let result = self.transport.send(request).await;
        let status = result.as_ref().map(|r| r.status).unwrap_or(0);
        self.telemetry
            .timing("http", started.elapsed(), &Self::tags(request, status));

        let response = result?;
        info!(status = response.status, "Airtable StatusCode {}", response.status);
        if response.status != 200 {
            error!(status = response.status, body = %response.body, "Airtable returned non-200 response");
        }
        Ok(response)
    }

    async fn backoff(&self, request: &PreparedRequest, retry: u32, delay: Duration) {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        warn!(retry, delay_ms, "Retrying Airtable request in {} ms", delay_ms);
        self.telemetry
            .count("airtable.retry", 1, &Self::tags(request, RETRY_STATUS));
        tokio::time::sleep(delay).await;
    }

    fn tags(request: &PreparedRequest, status: u16) -> Tags {
        Tags::from([
            ("url".to_string(), request.url().clone()),
            ("method".to_string(), request.method().to_string()),
            ("status_code".to_string(), status.to_string()),
        ])
    }
}
