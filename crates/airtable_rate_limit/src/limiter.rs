//! Request rate limiter built on governor.
//!
//! Governor implements GCRA (Generic Cell Rate Algorithm), which is lock-free,
//! so one limiter can be shared by every clone of a client and by every task
//! using it.

use airtable_core::RateLimitSettings;
use airtable_error::{AirtableResult, ConfigError};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

// Type alias for our direct rate limiter
type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Steady token issuer: one token every `1 / rate` seconds, burst of one.
///
/// Cloning shares the underlying quota.
///
/// # Example
///
/// ```rust,ignore
/// use airtable_rate_limit::RateLimiter;
///
/// let limiter = RateLimiter::per_second(10)?;
/// let granted_at = limiter.acquire().await;
/// // dispatch the request...
/// ```
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectRateLimiter>,
    rate: NonZeroU32,
}

impl RateLimiter {
    /// Create a limiter issuing `rate` tokens per second.
    pub fn new(rate: NonZeroU32) -> Self {
        debug!(rate = rate.get(), "Creating rate limiter");
        // Burst of one keeps issuance evenly spaced instead of front-loading a second's worth.
        let quota = Quota::per_second(rate).allow_burst(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(GovernorRateLimiter::direct(quota)),
            rate,
        }
    }

    /// Create a limiter from a raw rate.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `rate` is zero.
    #[track_caller]
    pub fn per_second(rate: u32) -> AirtableResult<Self> {
        NonZeroU32::new(rate)
            .map(Self::new)
            .ok_or_else(|| ConfigError::new("Rate limit must be at least one request per second").into())
    }

    /// Create a limiter from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the configured rate is zero.
    pub fn from_settings(settings: &RateLimitSettings) -> AirtableResult<Self> {
        Self::per_second(settings.requests_per_second)
    }

    /// Wait until a token is available and take it.
    ///
    /// Returns the instant the token was granted. The wait cannot be cancelled
    /// other than by dropping the future.
    pub async fn acquire(&self) -> Instant {
        self.limiter.until_ready().await;
        let granted = Instant::now();
        trace!("Rate limit token granted");
        granted
    }

    /// Take a token only if one is available right now.
    pub fn try_acquire(&self) -> Option<Instant> {
        self.limiter.check().ok().map(|_| Instant::now())
    }

    /// Configured tokens per second.
    pub fn rate(&self) -> u32 {
        self.rate.get()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("rate", &self.rate)
            .finish_non_exhaustive()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN))
    }
}
