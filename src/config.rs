use std::fs;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AsklineError, Result};
use crate::quick_actions::{self, QuickAction};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";
const DEFAULT_HEALTH_POLL_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    /// Per-request timeout. Unset means requests wait for the backend
    /// indefinitely, matching the original client.
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HealthConfig {
    pub poll_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub backend: Option<BackendConfig>,
    pub health: Option<HealthConfig>,
    pub quick_actions: Option<Vec<QuickAction>>,
}

impl Config {
    pub fn convention_defaults() -> Self {
        Self {
            backend: Some(BackendConfig {
                base_url: Some(DEFAULT_BASE_URL.to_string()),
                timeout_seconds: None,
            }),
            health: Some(HealthConfig {
                poll_seconds: Some(DEFAULT_HEALTH_POLL_SECONDS),
            }),
            quick_actions: None,
        }
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| AsklineError::Config(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| AsklineError::Config(e.to_string()))
    }

    pub fn base_url(&self) -> String {
        self.backend
            .as_ref()
            .and_then(|backend| backend.base_url.clone())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.backend
            .as_ref()
            .and_then(|backend| backend.timeout_seconds)
            .map(Duration::from_secs)
    }

    pub fn health_poll_interval(&self) -> Duration {
        let seconds = self
            .health
            .as_ref()
            .and_then(|health| health.poll_seconds)
            .unwrap_or(DEFAULT_HEALTH_POLL_SECONDS);
        Duration::from_secs(seconds.max(1))
    }

    pub fn quick_actions(&self) -> Vec<QuickAction> {
        match &self.quick_actions {
            Some(actions) if !actions.is_empty() => actions.clone(),
            _ => quick_actions::defaults(),
        }
    }
}
