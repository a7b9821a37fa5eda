//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for similarity search.

use async_trait::async_trait;

use crate::domain::errors::RagResult;

/// Trait for embedding providers (single and batch).
///
/// `embed` must be deterministic for a fixed (text, model) pair. Vectors
/// produced by different models are not comparable.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "openai", "hashing").
    fn name(&self) -> &'static str;

    /// Embedding model identifier; recorded in index snapshots.
    fn model(&self) -> &str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Verify the provider is usable (credentials present, etc.).
    fn check_ready(&self) -> RagResult<()> {
        Ok(())
    }

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>>;

    /// Generate embeddings for multiple texts in a single API call.
    ///
    /// Output order matches input order. Callers never pass more than
    /// [`max_batch_size`](Self::max_batch_size) texts.
    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>>;

    /// Maximum number of texts per single API call; 0 when unsupported.
    fn max_batch_size(&self) -> usize;
}
