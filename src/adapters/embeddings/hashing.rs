//! Offline feature-hashing embedder.
//!
//! Each lowercase alphanumeric token is hashed with FNV-1a into one of
//! `dimension` buckets with a hash-derived sign, and the result is
//! L2-normalised. Texts sharing vocabulary land close together, which is all
//! local runs and tests need. Text with no tokens embeds to the zero vector.

use async_trait::async_trait;

use crate::domain::errors::RagResult;
use crate::domain::ports::embedding::EmbeddingProvider;

pub const HASHING_MODEL: &str = "fnv1a-unigram-v1";

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic, network-free embedding provider.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimension: usize,
}

impl HashingEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokens(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    fn name(&self) -> &'static str {
        "hashing"
    }

    fn model(&self) -> &str {
        HASHING_MODEL
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }

    fn max_batch_size(&self) -> usize {
        256
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::vector::cosine_similarity;

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), FNV_OFFSET_BASIS);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_embedding_is_deterministic_and_normalized() {
        let provider = HashingEmbeddingProvider::new(64);
        let a = provider.embed_text("¿Qué es Python?");
        let b = provider.embed_text("¿Qué es Python?");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tokenization_ignores_case_and_punctuation() {
        let provider = HashingEmbeddingProvider::new(128);
        assert_eq!(
            provider.embed_text("RAG, FAISS!"),
            provider.embed_text("rag faiss")
        );
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let provider = HashingEmbeddingProvider::new(16);
        assert!(provider.embed_text("  ¿? ").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        let provider = HashingEmbeddingProvider::new(512);
        let python = provider.embed_text("Tema: Python Pregunta: qué es python lenguaje");
        let faiss = provider.embed_text("Tema: FAISS Pregunta: biblioteca de búsqueda vectorial");
        let query = provider.embed_text("python lenguaje");

        assert!(cosine_similarity(&query, &python) > cosine_similarity(&query, &faiss));
    }

    #[tokio::test]
    async fn test_batch_matches_single() {
        let provider = HashingEmbeddingProvider::new(32);
        let texts = vec!["uno".to_string(), "dos tres".to_string()];
        let batch = provider.embed_batch(&texts).await.unwrap();
        assert_eq!(batch[0], provider.embed("uno").await.unwrap());
        assert_eq!(batch[1], provider.embed("dos tres").await.unwrap());
    }
}
