//! Embedding service for batch and real-time vector generation.
//!
//! Orchestrates embedding generation across single and batch operations.
//! Small batches are embedded one text per call; larger ones go through the
//! provider's batch API in chunks of `max_batch_size`. Either way calls fan
//! out with bounded concurrency, output order matches input order, and the
//! first failure aborts the whole batch.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::config::EmbeddingConfig;
use crate::domain::ports::embedding::EmbeddingProvider;

/// Configuration for the embedding service.
#[derive(Debug, Clone)]
pub struct EmbeddingServiceConfig {
    /// Minimum number of items to trigger batch mode instead of individual calls.
    pub batch_threshold: usize,
    /// Maximum provider calls in flight.
    pub max_concurrency: usize,
}

impl Default for EmbeddingServiceConfig {
    fn default() -> Self {
        Self::from(&EmbeddingConfig::default())
    }
}

impl From<&EmbeddingConfig> for EmbeddingServiceConfig {
    fn from(config: &EmbeddingConfig) -> Self {
        Self {
            batch_threshold: config.batch_threshold,
            max_concurrency: config.max_concurrency.max(1),
        }
    }
}

/// Embedding service that orchestrates embedding generation.
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    config: EmbeddingServiceConfig,
}

impl EmbeddingService {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: EmbeddingServiceConfig) -> Self {
        Self { provider, config }
    }

    pub fn with_defaults(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::new(provider, EmbeddingServiceConfig::default())
    }

    /// Provider name for diagnostics.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Embedding model identifier.
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Embedding dimension.
    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    pub fn check_ready(&self) -> RagResult<()> {
        self.provider.check_ready()
    }

    /// Embed a single text.
    pub async fn embed_single(&self, text: &str) -> RagResult<Vec<f32>> {
        let vector = self.provider.embed(text).await?;
        self.check_dimension(&vector)?;
        Ok(vector)
    }

    /// Embed multiple texts, preserving order. All-or-nothing.
    pub async fn embed_many(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let max_size = self.provider.max_batch_size();
        let vectors = if texts.len() < self.config.batch_threshold || max_size == 0 {
            self.embed_individually(texts).await?
        } else {
            self.embed_chunked(texts, max_size).await?
        };

        if vectors.len() != texts.len() {
            return Err(RagError::provider(
                self.provider.name(),
                format!(
                    "returned {} embeddings for {} inputs",
                    vectors.len(),
                    texts.len()
                ),
            ));
        }
        for vector in &vectors {
            self.check_dimension(vector)?;
        }

        tracing::debug!(
            provider = self.provider.name(),
            count = vectors.len(),
            "embedded batch"
        );
        Ok(vectors)
    }

    // Futures come from a plain iterator so callers' futures stay spawnable.
    async fn embed_individually(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        let futures: Vec<_> = texts.iter().map(|text| self.provider.embed(text)).collect();
        stream::iter(futures)
            .buffered(self.config.max_concurrency)
            .try_collect()
            .await
    }

    async fn embed_chunked(&self, texts: &[String], max_size: usize) -> RagResult<Vec<Vec<f32>>> {
        let futures: Vec<_> = texts
            .chunks(max_size)
            .map(|chunk| self.embed_chunk(chunk))
            .collect();
        let chunks: Vec<Vec<Vec<f32>>> =
            stream::iter(futures)
                .buffered(self.config.max_concurrency)
                .try_collect()
                .await?;

        Ok(chunks.into_iter().flatten().collect())
    }

    async fn embed_chunk(&self, chunk: &[String]) -> RagResult<Vec<Vec<f32>>> {
        let vectors = self.provider.embed_batch(chunk).await?;
        if vectors.len() != chunk.len() {
            return Err(RagError::provider(
                self.provider.name(),
                format!(
                    "batch call returned {} embeddings for {} inputs",
                    vectors.len(),
                    chunk.len()
                ),
            ));
        }
        Ok(vectors)
    }

    fn check_dimension(&self, vector: &[f32]) -> RagResult<()> {
        let expected = self.provider.dimension();
        if vector.len() == expected {
            Ok(())
        } else {
            Err(RagError::DimensionMismatch {
                expected,
                found: vector.len(),
            })
        }
    }
}
