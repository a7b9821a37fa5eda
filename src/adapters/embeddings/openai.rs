//! OpenAI embedding provider adapter.
//!
//! Works against the OpenAI `/embeddings` endpoint or any compatible server
//! (Azure OpenAI, local inference servers).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::adapters::http::ProviderClient;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::config::ProviderConfig;
use crate::domain::ports::embedding::EmbeddingProvider;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const PROVIDER: &str = "openai";

/// Configuration for the OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    /// API key. Falls back to `OPENAI_API_KEY` env var.
    pub api_key: Option<String>,
    /// Base URL for the API. Default: `https://api.openai.com/v1`.
    pub base_url: String,
    /// Embedding model. Default: `text-embedding-3-small`.
    pub model: String,
    /// Expected embedding dimension. Default: 1536.
    pub dimension: usize,
    /// Maximum texts per single API request. Default: 2048.
    pub max_batch_size: usize,
}

impl Default for OpenAiEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENAI_BASE_URL.to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            max_batch_size: 2048,
        }
    }
}

impl OpenAiEmbeddingConfig {
    pub fn from_provider(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.embedding_api_key(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            model: config.embedding_model.clone(),
            dimension: config.embedding_dimension,
            ..Self::default()
        }
    }
}

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    config: OpenAiEmbeddingConfig,
    client: ProviderClient,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiEmbeddingConfig, client: ProviderClient) -> Self {
        Self { config, client }
    }

    fn api_key(&self) -> RagResult<&str> {
        self.config.api_key.as_deref().ok_or_else(|| {
            RagError::Configuration(
                "OpenAI API key not set. Set OPENAI_API_KEY env var or configure api_key."
                    .to_string(),
            )
        })
    }

    async fn call_embeddings_api(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        let request = self.client.post(&url).bearer_auth(self.api_key()?);
        let body = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };

        let result: EmbeddingsResponse = self.client.post_json(PROVIDER, request, &body).await?;

        // Sort by index to maintain input order
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn check_ready(&self) -> RagResult<()> {
        self.api_key().map(|_| ())
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let results = self.call_embeddings_api(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| RagError::provider(PROVIDER, "empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.call_embeddings_api(texts).await
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
