//! Embedding collaborator: UTF-8 text in, fixed-dimension vector out.
//!
//! The service is opaque; this module only normalizes input, speaks the
//! OpenAI-compatible `/embeddings` wire shape and enforces the caller-side
//! timeout configured on the shared HTTP client.

pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{EmbeddingError, EmbeddingResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingClient;

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::hashing::normalize_query;

/// Async interface used by retrieval, the loader and the answer engine.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embeds one text. Input is expected to be pre-normalized with
    /// [`normalize_query`]; implementations must not renormalize differently.
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;
}

/// Client for an OpenAI-compatible embeddings endpoint.
pub struct HttpEmbeddingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpEmbeddingClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> EmbeddingResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::Unavailable {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Normalizes raw user text the way every embedding call site must:
    /// whitespace-collapsed and truncated to the character budget.
    pub fn prepare_input(text: &str, max_chars: usize) -> String {
        normalize_query(text, max_chars)
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingClient for HttpEmbeddingClient {
    #[instrument(skip(self, text), fields(text_len = text.len(), model = %self.model))]
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let response = self
            .http
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": text,
            }))
            .send()
            .await
            .map_err(|e| EmbeddingError::Unavailable {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Unavailable {
                message: format!("status {status}: {body}"),
            });
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    message: e.to_string(),
                })?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| EmbeddingError::MalformedResponse {
                message: "response contained no embedding vector".to_string(),
            })?;

        debug!(dimension = vector.len(), "Embedding received");
        Ok(vector)
    }
}
