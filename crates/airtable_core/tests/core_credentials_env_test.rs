//! Tests for reading credentials from the environment.
//!
//! Kept to a single test so nothing else in this binary touches the
//! environment concurrently.

use airtable_core::{API_KEY_ENV, ClientCredentials, DEFAULT_BASE_URL};

#[test]
fn test_from_env_pairs_key_with_public_endpoint() {
    // SAFETY: the only test in this binary, so no other thread reads the environment.
    unsafe { std::env::remove_var(API_KEY_ENV) };
    assert!(ClientCredentials::from_env().is_err());

    // SAFETY: as above.
    unsafe { std::env::set_var(API_KEY_ENV, "keyFromEnv") };
    let credentials = ClientCredentials::from_env().unwrap();

    assert_eq!(API_KEY_ENV, "AIRTABLE_API_KEY");
    assert_eq!(credentials.base_url(), DEFAULT_BASE_URL);
    assert_eq!(DEFAULT_BASE_URL, "https://api.airtable.com/v0");
    assert_eq!(credentials.bearer(), "Bearer keyFromEnv");
}
