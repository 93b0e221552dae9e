//! OpenAI-compatible `/embeddings` client

use super::Embedder;
use crate::error::{IndexError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use supply_core::EmbeddingConfig;
use tracing::{debug, instrument};

/// Remote embedder speaking the OpenAI embeddings API
pub struct OpenAiEmbedder {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            dimension,
        })
    }

    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            IndexError::Config("OPENAI_API_KEY is not set for the openai embedding backend".to_string())
        })?;
        let dimension = known_dimension(&config.remote_model).unwrap_or(config.dimension);
        Self::new(
            api_key,
            &config.api_base,
            &config.remote_model,
            dimension,
            config.timeout_secs,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Output size of the published OpenAI embedding models
fn known_dimension(model: &str) -> Option<usize> {
    match model {
        "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn name(&self) -> String {
        format!("openai:{}", self.model)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    #[instrument(skip(self, texts), fields(model = %self.model, count = texts.len()))]
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Embedding(format!("HTTP {status}: {body}")));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| IndexError::Embedding(format!("Failed to parse response: {e}")))?;
        debug!(vectors = parsed.data.len(), "Received embeddings");

        order_vectors(parsed.data, texts.len())
    }
}

/// Put vectors back in input order using each item's `index`
fn order_vectors(mut data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(IndexError::Embedding(format!(
            "expected {expected} embeddings, received {}",
            data.len()
        )));
    }
    data.sort_by_key(|item| item.index);
    Ok(data.into_iter().map(|item| item.embedding).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_key() {
        assert!(OpenAiEmbedder::from_config(&EmbeddingConfig::default()).is_err());
    }

    #[test]
    fn test_from_config_uses_known_dimension() {
        let config = EmbeddingConfig {
            api_key: Some("sk-test".to_string()),
            api_base: "http://localhost:8080/v1/".to_string(),
            ..EmbeddingConfig::default()
        };
        let embedder = OpenAiEmbedder::from_config(&config).unwrap();
        assert_eq!(embedder.dimension(), 1536);
        assert_eq!(embedder.name(), "openai:text-embedding-3-small");
        assert_eq!(embedder.api_base, "http://localhost:8080/v1");
    }

    #[test]
    fn test_response_reordered_by_index() {
        let json = r#"{"data": [
            {"index": 1, "embedding": [0.0, 1.0]},
            {"index": 0, "embedding": [1.0, 0.0]}
        ]}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        let vectors = order_vectors(parsed.data, 2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_count_mismatch_is_error() {
        let parsed: EmbeddingResponse =
            serde_json::from_str(r#"{"data": [{"index": 0, "embedding": [1.0]}]}"#).unwrap();
        assert!(order_vectors(parsed.data, 2).is_err());
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let embedder = OpenAiEmbedder::new("sk-test", "http://127.0.0.1:9", "m", 4, 1).unwrap();
        assert!(embedder.embed(&[]).await.unwrap().is_empty());
    }
}
