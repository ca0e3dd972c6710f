//! Tests for request execution: headers, 422 backoff, error surface.
//!
//! Backoff tests run on a paused clock, so the full retry schedule
//! completes instantly.

mod test_utils;

use airtable_client::{AuthenticatedRequestExecutor, HttpMethod, Transport};
use airtable_core::{ClientCredentials, Telemetry};
use airtable_error::AirtableErrorKind;
use airtable_rate_limit::{RETRY_STATUS, RateLimiter, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{RecordingTelemetry, ScriptedTransport, Step};

const URL: &str = "https://api.example.test/v0/appA/Tasks";

fn executor(
    transport: &Arc<ScriptedTransport>,
    telemetry: &Arc<RecordingTelemetry>,
) -> AuthenticatedRequestExecutor {
    let transport: Arc<dyn Transport> = transport.clone();
    let telemetry: Arc<dyn Telemetry> = telemetry.clone();
    AuthenticatedRequestExecutor::new(
        ClientCredentials::new("keyTest", "https://api.example.test/v0").unwrap(),
        RateLimiter::per_second(1000).unwrap(),
        RetryPolicy::default(),
        transport,
        telemetry,
    )
}

#[tokio::test]
async fn test_credentials_attached_to_every_request() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::always(200));
    let telemetry = Arc::new(RecordingTelemetry::default());

    executor(&transport, &telemetry)
        .execute(HttpMethod::Post, URL, Some(b"{}".to_vec()))
        .await?;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].header("Authorization"), Some("Bearer keyTest"));
    assert_eq!(sent[0].header("Content-Type"), Some("application/json"));
    assert_eq!(sent[0].body().as_deref(), Some(&b"{}"[..]));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_422_exhausts_after_twenty_retries() {
    let transport = Arc::new(ScriptedTransport::always(422));
    let telemetry = Arc::new(RecordingTelemetry::default());
    let start = tokio::time::Instant::now();

    let err = executor(&transport, &telemetry)
        .execute(HttpMethod::Get, URL, None)
        .await
        .unwrap_err();

    match err.kind() {
        AirtableErrorKind::RetryExhausted(e) => {
            assert_eq!(e.url, URL);
            assert_eq!(e.retries, 20);
        }
        other => panic!("expected retry exhaustion, got {}", other),
    }
    assert_eq!(err.status(), Some(RETRY_STATUS));
    assert_eq!(transport.call_count(), 21);
    // 200 + 2_000 + 20_000 + 200_000 + 16 * 300_000
    assert!(start.elapsed() >= Duration::from_millis(5_022_200));
    assert_eq!(telemetry.counts().len(), 20);
}

#[tokio::test(start_paused = true)]
async fn test_422_then_success_resends_same_request() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::scripted(
        vec![
            Step::Respond(422, "busy".to_string()),
            Step::Respond(422, "busy".to_string()),
        ],
        Step::Respond(200, r#"{"records":[]}"#.to_string()),
    ));
    let telemetry = Arc::new(RecordingTelemetry::default());
    let start = tokio::time::Instant::now();

    let response = executor(&transport, &telemetry)
        .execute(HttpMethod::Patch, URL, Some(b"{\"records\":[]}".to_vec()))
        .await?;

    assert_eq!(response.status, 200);
    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent.windows(2).all(|pair| pair[0] == pair[1]));
    // 200ms, then 2000ms
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(2_200));
    assert!(elapsed < Duration::from_millis(20_000));
    Ok(())
}

#[tokio::test]
async fn test_other_statuses_are_not_errors() -> anyhow::Result<()> {
    for status in [201, 404, 500, 503] {
        let transport = Arc::new(ScriptedTransport::always(status));
        let telemetry = Arc::new(RecordingTelemetry::default());

        let response = executor(&transport, &telemetry)
            .execute(HttpMethod::Get, URL, None)
            .await?;

        assert_eq!(response.status, status);
        assert_eq!(transport.call_count(), 1, "status {} must not retry", status);
    }
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_is_not_retried() {
    let transport = Arc::new(ScriptedTransport::scripted(
        vec![Step::Fail("connection refused".to_string())],
        Step::Respond(200, String::new()),
    ));
    let telemetry = Arc::new(RecordingTelemetry::default());

    let err = executor(&transport, &telemetry)
        .execute(HttpMethod::Get, URL, None)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), AirtableErrorKind::Transport(_)));
    assert_eq!(transport.call_count(), 1);
    assert_eq!(telemetry.timings()[0].1["status_code"], "0");
}

#[tokio::test]
async fn test_every_attempt_emits_http_timing() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::scripted(
        vec![Step::Respond(422, String::new())],
        Step::Respond(200, String::new()),
    ));
    let telemetry = Arc::new(RecordingTelemetry::default());
    let policy = RetryPolicy::default()
        .with_intervals(Duration::from_millis(1), Duration::from_millis(1));
    let executor = AuthenticatedRequestExecutor::new(
        ClientCredentials::new("keyTest", "https://api.example.test/v0")?,
        RateLimiter::per_second(1000)?,
        policy,
        transport.clone(),
        telemetry.clone(),
    );

    executor.execute(HttpMethod::Get, URL, None).await?;

    let timings = telemetry.timings();
    assert_eq!(timings.len(), 2);
    assert!(timings.iter().all(|(name, _)| name == "http"));
    assert_eq!(timings[0].1["status_code"], "422");
    assert_eq!(timings[1].1["status_code"], "200");
    assert_eq!(timings[1].1["method"], "GET");
    assert_eq!(timings[1].1["url"], URL);

    let counts = telemetry.counts();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].0, "airtable.retry");
    Ok(())
}
