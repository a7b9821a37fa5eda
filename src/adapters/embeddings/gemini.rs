//! Gemini embedding provider adapter.
//!
//! Talks to the Google Generative Language API: `:embedContent` for single
//! texts and `:batchEmbedContents` for batches.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::adapters::http::ProviderClient;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::config::ProviderConfig;
use crate::domain::ports::embedding::EmbeddingProvider;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROVIDER: &str = "gemini";

/// Configuration for the Gemini embedding provider.
#[derive(Debug, Clone)]
pub struct GeminiEmbeddingConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Model resource name, e.g. `models/embedding-001`.
    pub model: String,
    pub dimension: usize,
    /// Batch endpoint limit. Default: 100.
    pub max_batch_size: usize,
}

impl Default for GeminiEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GEMINI_BASE_URL.to_string(),
            model: "models/embedding-001".to_string(),
            dimension: 768,
            max_batch_size: 100,
        }
    }
}

impl GeminiEmbeddingConfig {
    pub fn from_provider(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.embedding_api_key(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
            model: model_resource(&config.embedding_model),
            dimension: config.embedding_dimension,
            ..Self::default()
        }
    }
}

/// `embedding-001` and `models/embedding-001` name the same model.
pub(crate) fn model_resource(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

/// Gemini embedding provider.
pub struct GeminiEmbeddingProvider {
    config: GeminiEmbeddingConfig,
    client: ProviderClient,
}

impl GeminiEmbeddingProvider {
    pub fn new(config: GeminiEmbeddingConfig, client: ProviderClient) -> Self {
        Self { config, client }
    }

    fn api_key(&self) -> RagResult<&str> {
        self.config.api_key.as_deref().ok_or_else(|| {
            RagError::Configuration(
                "Gemini API key not set. Set GOOGLE_API_KEY or provider.api_key.".to_string(),
            )
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/{}:{method}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn content_request<'a>(&'a self, text: &'a str) -> EmbedContentRequest<'a> {
        EmbedContentRequest {
            model: &self.config.model,
            content: Content {
                parts: vec![Part { text }],
            },
        }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
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
        let request = self
            .client
            .post(&self.endpoint("embedContent"))
            .header("x-goog-api-key", self.api_key()?);

        let response: EmbedContentResponse = self
            .client
            .post_json(PROVIDER, request, &self.content_request(text))
            .await?;

        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = self
            .client
            .post(&self.endpoint("batchEmbedContents"))
            .header("x-goog-api-key", self.api_key()?);
        let body = BatchEmbedRequest {
            requests: texts.iter().map(|t| self.content_request(t)).collect(),
        };

        let response: BatchEmbedResponse = self.client.post_json(PROVIDER, request, &body).await?;
        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }
}

// -- Gemini API request/response types --

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_resource_prefix() {
        assert_eq!(model_resource("embedding-001"), "models/embedding-001");
        assert_eq!(model_resource("models/embedding-001"), "models/embedding-001");
    }

    #[test]
    fn test_request_shape() {
        let provider = GeminiEmbeddingProvider::new(
            GeminiEmbeddingConfig::default(),
            ProviderClient::new(&ProviderConfig::default(), &Default::default()).unwrap(),
        );
        let json = serde_json::to_value(provider.content_request("hola")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "models/embedding-001",
                "content": { "parts": [{ "text": "hola" }] }
            })
        );
        assert_eq!(
            provider.endpoint("embedContent"),
            format!("{GEMINI_BASE_URL}/models/embedding-001:embedContent")
        );
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let provider = GeminiEmbeddingProvider::new(
            GeminiEmbeddingConfig::default(),
            ProviderClient::new(&ProviderConfig::default(), &Default::default()).unwrap(),
        );
        assert!(matches!(
            provider.check_ready(),
            Err(RagError::Configuration(_))
        ));
    }
}
