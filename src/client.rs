use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AsklineError, Result};
use crate::health::BackendStatus;

#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub question: String,
}

/// Response shape of the ask endpoint. Every field is optional; the
/// backend mixes and matches them per request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Opaque reference-document descriptors. Recorded but not rendered.
    #[serde(default)]
    pub documents: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateImageResponse {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Thin HTTP client over the question-answering backend.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn apply_timeout(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// One question, one answer. Non-2xx responses become an `Http` error
    /// with the status code in the message.
    pub async fn ask(&self, question: &str) -> Result<AskResponse> {
        let url = self.endpoint("/api/ask");
        let request = self.apply_timeout(self.http.post(&url)).json(&AskRequest {
            question: question.to_string(),
        });

        let response = request
            .send()
            .await
            .map_err(|e| AsklineError::Http(e.to_string()))?;
        let status = response.status();
        info!(url = %url, status = status.as_u16(), "ask response");

        if !status.is_success() {
            return Err(AsklineError::Http(format!(
                "request failed: {}",
                status.as_u16()
            )));
        }
        response
            .json::<AskResponse>()
            .await
            .map_err(|e| AsklineError::Serialization(e.to_string()))
    }

    /// Liveness probe. Only the status code is interpreted; the body just
    /// has to be JSON.
    pub async fn health(&self) -> Result<BackendStatus> {
        let url = self.endpoint("/api/health");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AsklineError::Http(e.to_string()))?;

        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), "health check non-success");
            return Ok(BackendStatus::Degraded);
        }

        let _body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AsklineError::Serialization(e.to_string()))?;
        Ok(BackendStatus::Active)
    }

    /// Direct image generation, bypassing the assistant.
    pub async fn generate_image(&self, prompt: &str) -> Result<GenerateImageResponse> {
        let url = self.endpoint("/api/generate-image");
        let request = self
            .apply_timeout(self.http.post(&url))
            .json(&GenerateImageRequest {
                prompt: prompt.to_string(),
            });

        let response = request
            .send()
            .await
            .map_err(|e| AsklineError::Http(e.to_string()))?;
        let status = response.status();
        info!(url = %url, status = status.as_u16(), "generate-image response");

        if !status.is_success() {
            return Err(AsklineError::Http(format!(
                "request failed: {}",
                status.as_u16()
            )));
        }
        response
            .json::<GenerateImageResponse>()
            .await
            .map_err(|e| AsklineError::Serialization(e.to_string()))
    }

    /// Fetch an attached image once to learn whether the URL resolves,
    /// standing in for the browser's img load/error events.
    pub async fn probe_image(&self, url: &str) -> Result<()> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AsklineError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(AsklineError::Http(format!(
                "image fetch failed: {}",
                response.status().as_u16()
            )));
        }
        Ok(())
    }
}
