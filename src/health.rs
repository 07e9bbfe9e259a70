use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::Result;
use crate::scheduler::ScheduledJob;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Active,
    Degraded,
}

impl BackendStatus {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unknown => "Checking the assistant...",
            Self::Active => "The assistant is ready.",
            Self::Degraded => "The connection to the assistant is unstable...",
        }
    }
}

pub fn status_channel() -> (watch::Sender<BackendStatus>, watch::Receiver<BackendStatus>) {
    watch::channel(BackendStatus::Unknown)
}

/// Best-effort liveness hint. Each tick is independent: a 2xx marks the
/// backend active, a non-2xx marks it degraded, and a network or parse
/// failure is logged and leaves the last published status in place.
pub struct HealthProbeJob {
    client: Arc<ApiClient>,
    status: watch::Sender<BackendStatus>,
    interval: Duration,
}

impl HealthProbeJob {
    pub fn new(
        client: Arc<ApiClient>,
        status: watch::Sender<BackendStatus>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            status,
            interval,
        }
    }
}

#[async_trait]
impl ScheduledJob for HealthProbeJob {
    fn name(&self) -> &str {
        "health_probe"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run(&self) -> Result<()> {
        match self.client.health().await {
            Ok(status) => {
                debug!(?status, "health probe");
                self.status.send_if_modified(|current| {
                    if *current != status {
                        *current = status;
                        true
                    } else {
                        false
                    }
                });
            }
            Err(err) => {
                warn!(error = %err, "health probe failed");
            }
        }
        Ok(())
    }
}
