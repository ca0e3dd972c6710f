//! Test utilities for Airtable client tests.
//!
//! In-memory transport and telemetry doubles.

use airtable_client::{HttpResponse, PreparedRequest, Transport};
use airtable_core::{Tags, Telemetry};
use airtable_error::{AirtableResult, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One scripted outcome of a dispatch.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Step {
    /// Answer with this status and body
    Respond(u16, String),
    /// Fail before any response arrives
    Fail(String),
}

/// Transport replaying a script, then repeating its fallback forever.
#[derive(Debug)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    sent: Mutex<Vec<PreparedRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    /// Always answer `status` with an empty record list.
    pub fn always(status: u16) -> Self {
        Self::scripted(Vec::new(), Step::Respond(status, r#"{"records":[]}"#.to_string()))
    }

    /// Play `steps` in order, then `fallback`.
    pub fn scripted(steps: Vec<Step>, fallback: Step) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            fallback,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Requests dispatched so far.
    pub fn sent(&self) -> Vec<PreparedRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of requests dispatched so far.
    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &PreparedRequest) -> AirtableResult<HttpResponse> {
        self.sent.lock().unwrap().push(request.clone());
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match step {
            Step::Respond(status, body) => Ok(HttpResponse::new(status, body)),
            Step::Fail(message) => Err(TransportError::new(message).into()),
        }
    }
}

/// Telemetry sink remembering every observation.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    timings: Mutex<Vec<(String, Tags)>>,
    counts: Mutex<Vec<(String, i64, Tags)>>,
}

#[allow(dead_code)]
impl RecordingTelemetry {
    /// `(name, tags)` of every timing, in order.
    pub fn timings(&self) -> Vec<(String, Tags)> {
        self.timings.lock().unwrap().clone()
    }

    /// `(name, value, tags)` of every count, in order.
    pub fn counts(&self) -> Vec<(String, i64, Tags)> {
        self.counts.lock().unwrap().clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn incr(&self, name: &str, tags: &Tags) {
        self.count(name, 1, tags);
    }

    fn decr(&self, name: &str, tags: &Tags) {
        self.count(name, -1, tags);
    }

    fn timing(&self, name: &str, _value: Duration, tags: &Tags) {
        self.timings
            .lock()
            .unwrap()
            .push((name.to_string(), tags.clone()));
    }

    fn count(&self, name: &str, value: i64, tags: &Tags) {
        self.counts
            .lock()
            .unwrap()
            .push((name.to_string(), value, tags.clone()));
    }
}
