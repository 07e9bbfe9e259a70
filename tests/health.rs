use std::sync::Arc;
use std::time::Duration;

use httpmock::Method::GET;
use httpmock::MockServer;
use serde_json::json;

use askline::client::ApiClient;
use askline::health::{self, BackendStatus, HealthProbeJob};
use askline::scheduler::{ScheduledJob, Scheduler};

fn job_for(server_url: &str) -> (HealthProbeJob, tokio::sync::watch::Receiver<BackendStatus>) {
    let client = Arc::new(ApiClient::new(server_url, None));
    let (tx, rx) = health::status_channel();
    (
        HealthProbeJob::new(client, tx, Duration::from_secs(30)),
        rx,
    )
}

#[tokio::test]
async fn healthy_backend_is_published_as_active() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200).json_body(json!({"status": "ok"}));
        })
        .await;

    let (job, rx) = job_for(&server.base_url());
    assert_eq!(*rx.borrow(), BackendStatus::Unknown);

    job.run().await.expect("probe tick");
    assert_eq!(*rx.borrow(), BackendStatus::Active);
    mock.assert_calls(1);
}

#[tokio::test]
async fn non_2xx_is_published_as_degraded() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/health");
            then.status(503);
        })
        .await;

    let (job, rx) = job_for(&server.base_url());
    job.run().await.expect("probe tick");
    assert_eq!(*rx.borrow(), BackendStatus::Degraded);
}

#[tokio::test]
async fn network_failure_is_swallowed_and_status_unchanged() {
    // Nothing listens on this port; the connection is refused.
    let client = Arc::new(ApiClient::new("http://127.0.0.1:9", None));
    let (tx, rx) = health::status_channel();
    tx.send(BackendStatus::Active).expect("seed status");
    let job = HealthProbeJob::new(client, tx, Duration::from_secs(30));

    job.run().await.expect("probe tick never errors out");
    assert_eq!(*rx.borrow(), BackendStatus::Active);
}

#[tokio::test]
async fn unparsable_health_body_leaves_status_unchanged() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200).body("plain text, not json");
        })
        .await;

    let (job, rx) = job_for(&server.base_url());
    job.run().await.expect("probe tick");
    assert_eq!(*rx.borrow(), BackendStatus::Unknown);
}

#[tokio::test]
async fn scheduler_probes_at_startup_without_waiting_a_full_interval() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200).json_body(json!({"status": "ok"}));
        })
        .await;

    let client = Arc::new(ApiClient::new(&server.base_url(), None));
    let (tx, mut rx) = health::status_channel();
    let mut scheduler = Scheduler::new();
    scheduler.register_job(Arc::new(HealthProbeJob::new(
        client,
        tx,
        Duration::from_secs(30),
    )));
    scheduler.start();

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("startup probe within the timeout")
        .expect("status update");
    assert_eq!(*rx.borrow(), BackendStatus::Active);

    scheduler.stop().await;
    mock.assert_calls(1);
}
