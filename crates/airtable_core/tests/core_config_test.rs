//! Tests for layered configuration loading.

use airtable_core::{AirtableConfig, DEFAULT_BASE_URL, MAX_BATCH_SIZE};
use std::fs;
use std::path::Path;

fn write_home_config(home: &Path, contents: &str) {
    let dir = home.join(".config/airtable");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("airtable.toml"), contents).unwrap();
}

#[test]
fn test_load_bundled_defaults() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let working = tempfile::tempdir()?;

    let config = AirtableConfig::load_layered(Some(home.path()), working.path())?;

    assert_eq!(config, AirtableConfig::default());
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.rate_limit.requests_per_second, 10);
    assert_eq!(config.retry.initial_interval_ms, 200);
    assert_eq!(config.retry.max_retries, 20);
    assert_eq!(config.batch.size, MAX_BATCH_SIZE);
    Ok(())
}

#[test]
fn test_home_overrides_bundled_defaults() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let working = tempfile::tempdir()?;
    write_home_config(home.path(), "strict_writes = true\n[batch]\nsize = 7\n");

    let config = AirtableConfig::load_layered(Some(home.path()), working.path())?;

    assert!(config.strict_writes);
    assert_eq!(config.batch.size, 7);
    assert_eq!(config.rate_limit.requests_per_second, 10);
    Ok(())
}

#[test]
fn test_working_dir_overrides_home() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let working = tempfile::tempdir()?;
    write_home_config(
        home.path(),
        "[rate_limit]\nrequests_per_second = 5\n[batch]\nsize = 7\n",
    );
    fs::write(
        working.path().join("airtable.toml"),
        "[rate_limit]\nrequests_per_second = 3\n",
    )?;

    let config = AirtableConfig::load_layered(Some(home.path()), working.path())?;

    assert_eq!(config.rate_limit.requests_per_second, 3);
    assert_eq!(config.batch.size, 7);
    assert_eq!(config.retry.max_retries, 20);
    Ok(())
}

#[test]
fn test_invalid_layer_fails_validation() -> anyhow::Result<()> {
    let working = tempfile::tempdir()?;
    fs::write(working.path().join("airtable.toml"), "[batch]\nsize = 0\n")?;

    assert!(AirtableConfig::load_layered(None, working.path()).is_err());
    Ok(())
}
