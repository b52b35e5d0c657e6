//! Answer service abstraction and HTTP client.
//!
//! The answer service is a locally colocated process that loads the legal QA
//! model and serves one-shot question answering. The controller only talks to
//! it through the `AnswerBackend` trait, so tests can substitute a scripted
//! backend.

mod http;

pub use http::{HttpBackend, DEFAULT_BASE_URL};

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend api error: {0}")]
    Api(String),
}

/// Remote answer service: a health signal plus one-shot question answering.
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Check the health signal; Ok means the service is ready to answer.
    async fn health(&self) -> Result<(), BackendError>;

    /// Ask one question; returns the complete answer text.
    async fn answer(&self, question: &str) -> Result<String, BackendError>;
}
