//! HTTP client for the answer service (http://127.0.0.1:5001 by default).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AnswerBackend, BackendError};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// Health probes get a short timeout of their own; the answer timeout is
/// sized for model generation and would make a dead backend look slow.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the answer service HTTP API.
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// `base_url` falls back to `DEFAULT_BASE_URL`; `request_timeout` bounds
    /// one answer request end to end.
    pub fn new(base_url: Option<String>, request_timeout: Duration) -> Result<Self, BackendError> {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AnswerBackend for HttpBackend {
    /// GET /api/health — success status means the model is loaded.
    async fn health(&self) -> Result<(), BackendError> {
        let url = format!("{}/api/health", self.base_url);
        let res = self.client.get(&url).timeout(PROBE_TIMEOUT).send().await?;
        if !res.status().is_success() {
            return Err(BackendError::Api(res.status().to_string()));
        }
        Ok(())
    }

    /// POST /api/answer — send one question, receive the full answer.
    async fn answer(&self, question: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/answer", self.base_url);
        let body = AnswerRequest { question };
        let res = self.client.post(&url).json(&body).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(BackendError::Api(format!("{} {}", status, body)));
        }
        let data: AnswerResponse = res.json().await?;
        Ok(data.answer)
    }
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnswerResponse {
    answer: String,
}
