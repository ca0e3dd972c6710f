//! Layered configuration for the Airtable client.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Bundled defaults (`airtable.toml` shipped with the library)
//! 2. `~/.config/airtable/airtable.toml`
//! 3. `./airtable.toml`
//!
//! User files are optional and silently skipped when absent.

use crate::{API_KEY_ENV, DEFAULT_BASE_URL, MAX_BATCH_SIZE};
use airtable_error::{AirtableError, AirtableResult, ConfigError};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../airtable.toml");

/// Token issuance rate for outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RateLimitSettings {
    /// Steady request rate; no bursting above it
    pub requests_per_second: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
        }
    }
}

/// Backoff parameters for transient (422) responses.
///
/// The transient status itself is fixed; only the delays and the ceiling
/// are tunable.
///
/// # Example
///
/// ```toml
/// [retry]
/// initial_interval_ms = 200
/// multiplier = 10
/// max_interval_ms = 300_000
/// max_retries = 20
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RetrySettings {
    /// Delay before the first retry
    pub initial_interval_ms: u64,
    /// Growth factor applied after every retry
    pub multiplier: u32,
    /// Upper bound on a single delay
    pub max_interval_ms: u64,
    /// Retries allowed after the first attempt
    pub max_retries: u32,
}

impl RetrySettings {
    /// Delay before the first retry.
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    /// Upper bound on a single delay.
    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            initial_interval_ms: 200,
            multiplier: 10,
            max_interval_ms: 300_000,
            max_retries: 20,
        }
    }
}

/// Chunking of bulk updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct BatchSettings {
    /// Records per write request
    pub size: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            size: MAX_BATCH_SIZE,
        }
    }
}

/// Top-level client configuration.
///
/// # Example
///
/// ```no_run
/// use airtable_core::AirtableConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AirtableConfig::load()?;
/// println!("Requests per second: {}", config.rate_limit.requests_per_second);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AirtableConfig {
    /// Service base URL
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Turn non-2xx write responses into errors
    #[serde(default)]
    pub strict_writes: bool,
    /// Request rate
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    /// 422 backoff
    #[serde(default)]
    pub retry: RetrySettings,
    /// Update chunking
    #[serde(default)]
    pub batch: BatchSettings,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: API_KEY_ENV.to_string(),
            strict_writes: false,
            rate_limit: RateLimitSettings::default(),
            retry: RetrySettings::default(),
            batch: BatchSettings::default(),
        }
    }
}

impl AirtableConfig {
    /// Load configuration from a specific file path, on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> AirtableResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                AirtableError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AirtableError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is unavailable, a present
    /// file cannot be parsed or the merged values fail validation.
    #[instrument]
    pub fn load() -> AirtableResult<Self> {
        let working_dir = std::env::current_dir().map_err(|e| {
            ConfigError::new(format!("Failed to resolve working directory: {}", e))
        })?;
        Self::load_layered(dirs::home_dir().as_deref(), &working_dir)
    }

    /// Load bundled defaults, then `<home>/.config/airtable/airtable.toml`,
    /// then `<working_dir>/airtable.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or the merged
    /// values fail validation.
    #[instrument(skip_all, fields(working_dir = %working_dir.display()))]
    pub fn load_layered(
        home_dir: Option<&std::path::Path>,
        working_dir: &std::path::Path,
    ) -> AirtableResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = home_dir {
            let home_config = home.join(".config/airtable/airtable.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::from(working_dir.join("airtable.toml")).required(false));

        let config: Self = builder
            .build()
            .map_err(|e| {
                AirtableError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AirtableError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first offending setting.
    pub fn validate(&self) -> AirtableResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::new("base_url must not be empty").into());
        }
        if self.rate_limit.requests_per_second == 0 {
            return Err(ConfigError::new("rate_limit.requests_per_second must be positive").into());
        }
        if self.retry.multiplier == 0 {
            return Err(ConfigError::new("retry.multiplier must be positive").into());
        }
        if self.retry.max_interval_ms < self.retry.initial_interval_ms {
            return Err(ConfigError::new(
                "retry.max_interval_ms must not be below retry.initial_interval_ms",
            )
            .into());
        }
        if self.batch.size == 0 || self.batch.size > MAX_BATCH_SIZE {
            return Err(ConfigError::new(format!(
                "batch.size must be between 1 and {}",
                MAX_BATCH_SIZE
            ))
            .into());
        }
        Ok(())
    }
}
