//! Metrics sink interface.
//!
//! The client never reaches for a global metrics registry. A [`Telemetry`]
//! implementation is handed to it at construction time and defaults to
//! [`NoopTelemetry`].

use opentelemetry::{
    KeyValue, global,
    metrics::{Histogram, Meter, UpDownCounter},
};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

/// Tag map attached to every observation.
pub type Tags = BTreeMap<String, String>;

/// Named counters and timings with tags.
pub trait Telemetry: Send + Sync + std::fmt::Debug {
    /// Add one to `name`.
    fn incr(&self, name: &str, tags: &Tags);
    /// Subtract one from `name`.
    fn decr(&self, name: &str, tags: &Tags);
    /// Record how long `name` took.
    fn timing(&self, name: &str, value: Duration, tags: &Tags);
    /// Add `value` to `name`.
    fn count(&self, name: &str, value: i64, tags: &Tags);
}

/// Discards every observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn incr(&self, _name: &str, _tags: &Tags) {}
    fn decr(&self, _name: &str, _tags: &Tags) {}
    fn timing(&self, _name: &str, _value: Duration, _tags: &Tags) {}
    fn count(&self, _name: &str, _value: i64, _tags: &Tags) {}
}

/// Writes each observation as a structured `tracing` event.
///
/// Events carry `metric = true` so a log pipeline can route them apart from
/// ordinary log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn incr(&self, name: &str, tags: &Tags) {
        info!(metric = true, metric_name = name, kind = "incr", ?tags, "+1");
    }

    fn decr(&self, name: &str, tags: &Tags) {
        info!(metric = true, metric_name = name, kind = "decr", ?tags, "-1");
    }

    fn timing(&self, name: &str, value: Duration, tags: &Tags) {
        let value_ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        info!(metric = true, metric_name = name, kind = "timing", ?tags, value_ms, "{}", value_ms);
    }

    fn count(&self, name: &str, value: i64, tags: &Tags) {
        info!(metric = true, metric_name = name, kind = "count", ?tags, value, "{}", value);
    }
}

/// Forwards observations to OpenTelemetry instruments on the global meter.
///
/// Counters and timings share two instruments; the observation name travels
/// as the `name` attribute next to the tags.
#[derive(Clone)]
pub struct OtelTelemetry {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    counters: UpDownCounter<i64>,
    timings: Histogram<f64>,
}

impl OtelTelemetry {
    /// Register instruments on the global meter named `scope`.
    ///
    /// Observations go nowhere until the host installs a meter provider.
    pub fn new(scope: &'static str) -> Self {
        Self::from_meter(global::meter(scope))
    }

    /// Register instruments on `meter`.
    pub fn from_meter(meter: Meter) -> Self {
        Self {
            counters: meter
                .i64_up_down_counter("airtable.events")
                .with_description("Named Airtable client counters")
                .build(),
            timings: meter
                .f64_histogram("airtable.timing")
                .with_unit("ms")
                .with_description("Named Airtable client timings")
                .build(),
            _meter: meter,
        }
    }

    fn attributes(name: &str, tags: &Tags) -> Vec<KeyValue> {
        std::iter::once(KeyValue::new("name", name.to_string()))
            .chain(
                tags.iter()
                    .map(|(k, v)| KeyValue::new(k.clone(), v.clone())),
            )
            .collect()
    }
}

impl std::fmt::Debug for OtelTelemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtelTelemetry").finish_non_exhaustive()
    }
}

impl Default for OtelTelemetry {
    fn default() -> Self {
        Self::new("airtable")
    }
}

impl Telemetry for OtelTelemetry {
    fn incr(&self, name: &str, tags: &Tags) {
        self.counters.add(1, &Self::attributes(name, tags));
    }

    fn decr(&self, name: &str, tags: &Tags) {
        self.counters.add(-1, &Self::attributes(name, tags));
    }

    fn timing(&self, name: &str, value: Duration, tags: &Tags) {
        self.timings
            .record(value.as_secs_f64() * 1000.0, &Self::attributes(name, tags));
    }

    fn count(&self, name: &str, value: i64, tags: &Tags) {
        self.counters.add(value, &Self::attributes(name, tags));
    }
}
