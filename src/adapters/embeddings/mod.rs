//! Embedding provider adapters.

pub mod gemini;
pub mod hashing;
pub mod openai;

use std::sync::Arc;

pub use gemini::{GeminiEmbeddingConfig, GeminiEmbeddingProvider};
pub use hashing::HashingEmbeddingProvider;
pub use openai::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};

use crate::adapters::http::ProviderClient;
use crate::domain::models::config::{ProviderConfig, ProviderKind};
use crate::domain::ports::EmbeddingProvider;

/// Build the embedding provider selected by `config.kind`.
pub fn embedding_provider(
    config: &ProviderConfig,
    client: &ProviderClient,
) -> Arc<dyn EmbeddingProvider> {
    match config.kind {
        ProviderKind::Gemini => Arc::new(GeminiEmbeddingProvider::new(
            GeminiEmbeddingConfig::from_provider(config),
            client.clone(),
        )),
        ProviderKind::OpenAi => Arc::new(OpenAiEmbeddingProvider::new(
            OpenAiEmbeddingConfig::from_provider(config),
            client.clone(),
        )),
        ProviderKind::Hashing => Arc::new(HashingEmbeddingProvider::new(config.embedding_dimension)),
    }
}
