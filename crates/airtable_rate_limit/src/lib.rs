//! Rate limiting and retry scheduling for Airtable requests.
//!
//! Two pieces sit underneath every request the client sends:
//!
//! - [`RateLimiter`] hands out one token per attempt at a steady rate
//!   (10 per second by default, no bursting).
//! - [`RetryPolicy`] decides what happens after each response. Only one
//!   status (422) is transient; it is answered with a growing delay until
//!   the retry ceiling is reached. Each call drives its own
//!   [`RetryMachine`] through the states in [`RetryState`].

mod limiter;
mod retry;

pub use limiter::RateLimiter;
pub use retry::{BackoffSchedule, RETRY_STATUS, RetryMachine, RetryPolicy, RetryState};
