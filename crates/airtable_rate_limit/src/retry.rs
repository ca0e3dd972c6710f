//! Backoff for transient responses.
//!
//! A request runs through a small state machine:
//!
//! ```text
//!               status != 422
//! Attempting ───────────────────────► Succeeded
//!     │  ▲
//!     │  │ delay elapsed
//!     ▼  │
//!   Backoff        (422, ceiling reached) ──► Exhausted
//! ```
//!
//! Delays start at the initial interval and grow by the multiplier after
//! every retry, never exceeding the cap.

use airtable_core::RetrySettings;
use airtable_error::{AirtableResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Where a single request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetryState {
    /// About to dispatch attempt number `attempt` (1-based).
    Attempting {
        /// Attempt about to be sent
        attempt: u32,
    },
    /// Waiting `delay` before retry number `retry` (1-based).
    Backoff {
        /// Retry being waited for
        retry: u32,
        /// How long to wait
        delay: Duration,
    },
    /// A non-transient status arrived after `attempts` dispatches.
    Succeeded {
        /// Dispatches performed
        attempts: u32,
    },
    /// The retry ceiling was hit.
    Exhausted {
        /// Retries performed
        retries: u32,
    },
}

/// Sequence of delays, one per allowed retry.
///
/// # Examples
///
/// ```
/// use airtable_rate_limit::RetryPolicy;
/// use std::time::Duration;
///
/// let delays: Vec<Duration> = RetryPolicy::default().schedule().take(6).collect();
/// let millis: Vec<u128> = delays.iter().map(Duration::as_millis).collect();
/// assert_eq!(millis, [200, 2_000, 20_000, 200_000, 300_000, 300_000]);
/// ```
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    next: Duration,
    multiplier: u32,
    max_interval: Duration,
    remaining: u32,
}

impl Iterator for BackoffSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let delay = self.next.min(self.max_interval);
        self.next = self.next.saturating_mul(self.multiplier);
        Some(delay)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BackoffSchedule {}

/// The only status answered with a retry.
pub const RETRY_STATUS: u16 = 422;

/// How long to back off after a 422 and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryPolicy {
    initial_interval: Duration,
    multiplier: u32,
    max_interval: Duration,
    max_retries: u32,
}

impl RetryPolicy {
    /// Build a policy from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the multiplier is zero or the cap
    /// is below the initial interval.
    pub fn from_settings(settings: &RetrySettings) -> AirtableResult<Self> {
        if settings.multiplier == 0 {
            return Err(ConfigError::new("retry multiplier must be positive").into());
        }
        if settings.max_interval() < settings.initial_interval() {
            return Err(ConfigError::new("retry cap is below the initial interval").into());
        }
        Ok(Self {
            initial_interval: settings.initial_interval(),
            multiplier: settings.multiplier,
            max_interval: settings.max_interval(),
            max_retries: settings.max_retries,
        })
    }

    /// Same policy with a different retry ceiling.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Same policy with different delays.
    pub fn with_intervals(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_interval = initial;
        self.max_interval = max.max(initial);
        self
    }

    /// Retries allowed after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Every delay this policy would sleep, in order.
    pub fn schedule(&self) -> BackoffSchedule {
        BackoffSchedule {
            next: self.initial_interval,
            multiplier: self.multiplier,
            max_interval: self.max_interval,
            remaining: self.max_retries,
        }
    }

    /// Fresh state machine for one request.
    pub fn start(&self) -> RetryMachine {
        RetryMachine {
            schedule: self.schedule(),
            state: RetryState::Attempting { attempt: 1 },
            attempts: 0,
            retries: 0,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let settings = RetrySettings::default();
        Self {
            initial_interval: settings.initial_interval(),
            multiplier: settings.multiplier,
            max_interval: settings.max_interval(),
            max_retries: settings.max_retries,
        }
    }
}

/// Retry bookkeeping for one request.
///
/// The caller dispatches while the state is `Attempting`, reports each
/// status with [`on_status`](Self::on_status), sleeps while it is `Backoff`
/// and reports the sleep with [`on_backoff_elapsed`](Self::on_backoff_elapsed).
#[derive(Debug, Clone)]
pub struct RetryMachine {
    schedule: BackoffSchedule,
    state: RetryState,
    attempts: u32,
    retries: u32,
}

impl RetryMachine {
    /// Current state.
    pub fn state(&self) -> RetryState {
        self.state
    }

    /// Dispatches reported so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record the status of the attempt that was just dispatched.
    ///
    /// Has no effect outside `Attempting`.
    pub fn on_status(&mut self, status: u16) -> RetryState {
        let RetryState::Attempting { .. } = self.state else {
            return self.state;
        };
        self.attempts += 1;

        self.state = if status != RETRY_STATUS {
            RetryState::Succeeded {
                attempts: self.attempts,
            }
        } else {
            match self.schedule.next() {
                Some(delay) => {
                    self.retries += 1;
                    let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                    debug!(retry = self.retries, delay_ms, "Scheduling retry");
                    RetryState::Backoff {
                        retry: self.retries,
                        delay,
                    }
                }
                None => RetryState::Exhausted {
                    retries: self.retries,
                },
            }
        };
        self.state
    }

    /// Record that the backoff delay has passed.
    ///
    /// Has no effect outside `Backoff`.
    pub fn on_backoff_elapsed(&mut self) -> RetryState {
        if let RetryState::Backoff { .. } = self.state {
            self.state = RetryState::Attempting {
                attempt: self.attempts + 1,
            };
        }
        self.state
    }

    /// True once the machine has reached `Succeeded` or `Exhausted`.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            RetryState::Succeeded { .. } | RetryState::Exhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_on_first_attempt() {
        let mut machine = RetryPolicy::default().start();
        assert_eq!(machine.state(), RetryState::Attempting { attempt: 1 });
        assert_eq!(machine.on_status(200), RetryState::Succeeded { attempts: 1 });
        assert!(machine.is_finished());
    }

    #[test]
    fn only_422_is_retried() {
        for status in [200, 201, 204, 400, 401, 404, 429, 500, 503] {
            let mut machine = RetryPolicy::default().start();
            assert_eq!(machine.on_status(status), RetryState::Succeeded { attempts: 1 });
        }
    }

    #[test]
    fn backoff_then_success() {
        let mut machine = RetryPolicy::default().start();
        assert_eq!(
            machine.on_status(422),
            RetryState::Backoff {
                retry: 1,
                delay: Duration::from_millis(200)
            }
        );
        assert_eq!(machine.on_backoff_elapsed(), RetryState::Attempting { attempt: 2 });
        assert_eq!(machine.on_status(200), RetryState::Succeeded { attempts: 2 });
    }

    #[test]
    fn ceiling_reached_after_twenty_retries() {
        let mut machine = RetryPolicy::default().start();
        let mut delays = Vec::new();
        loop {
            match machine.on_status(422) {
                RetryState::Backoff { delay, .. } => {
                    delays.push(delay.as_millis());
                    machine.on_backoff_elapsed();
                }
                RetryState::Exhausted { retries } => {
                    assert_eq!(retries, 20);
                    break;
                }
                other => panic!("unexpected state {:?}", other),
            }
        }
        assert_eq!(machine.attempts(), 21);
        assert_eq!(delays.len(), 20);
        assert_eq!(&delays[..5], &[200, 2_000, 20_000, 200_000, 300_000]);
        assert!(delays[4..].iter().all(|d| *d == 300_000));
    }

    #[test]
    fn zero_retries_exhausts_immediately() {
        let mut machine = RetryPolicy::default().with_max_retries(0).start();
        assert_eq!(machine.on_status(422), RetryState::Exhausted { retries: 0 });
    }

    #[test]
    fn events_out_of_order_are_ignored() {
        let mut machine = RetryPolicy::default().start();
        assert_eq!(machine.on_backoff_elapsed(), RetryState::Attempting { attempt: 1 });
        machine.on_status(422);
        let backoff = machine.state();
        assert_eq!(machine.on_status(200), backoff);
    }

    #[test]
    fn zero_multiplier_is_rejected() {
        let settings = RetrySettings {
            multiplier: 0,
            ..RetrySettings::default()
        };
        assert!(RetryPolicy::from_settings(&settings).is_err());
    }
}
