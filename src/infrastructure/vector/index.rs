//! In-memory vector index with exact cosine top-k search.
//!
//! The index is built once from a full batch (or loaded from a snapshot) and
//! never mutated afterwards, so it can be shared behind an `Arc` by any number
//! of concurrent readers.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::Record;

/// A vector bound to its record. `id` is the insertion position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: usize,
    pub vector: Vec<f32>,
    pub record: Record,
}

/// One ranked query hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub entry: &'a IndexEntry,
    pub similarity: f32,
}

impl<'a> SearchHit<'a> {
    pub fn record(&self) -> &'a Record {
        &self.entry.record
    }
}

/// Ordered collection of index entries sharing one dimension.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    norms: Vec<f32>,
    dimension: usize,
    built: bool,
}

impl VectorIndex {
    /// Build an index from `(vector, record)` pairs in insertion order.
    pub fn build(pairs: Vec<(Vec<f32>, Record)>) -> RagResult<Self> {
        let Some((first, _)) = pairs.first() else {
            return Err(RagError::EmptyCorpus);
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err(RagError::Corpus(
                "embedding provider returned zero-length vectors".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(pairs.len());
        for (id, (vector, record)) in pairs.into_iter().enumerate() {
            if vector.len() != dimension {
                return Err(RagError::DimensionMismatch {
                    expected: dimension,
                    found: vector.len(),
                });
            }
            entries.push(IndexEntry { id, vector, record });
        }

        Ok(Self::from_entries(dimension, entries))
    }

    /// Assemble an index from entries already validated against `dimension`.
    pub(crate) fn from_entries(dimension: usize, entries: Vec<IndexEntry>) -> Self {
        let norms = entries.iter().map(|entry| magnitude(&entry.vector)).collect();
        Self {
            entries,
            norms,
            dimension,
            built: true,
        }
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shared vector dimension; 0 before build.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Top-k entries by descending cosine similarity.
    ///
    /// `k` is clamped to the index size. Equal similarities rank the earlier
    /// inserted entry first.
    pub fn query(&self, vector: &[f32], k: usize) -> RagResult<Vec<SearchHit<'_>>> {
        if !self.built {
            return Err(RagError::NotBuilt);
        }
        let k = k.min(self.entries.len());
        if k == 0 {
            return Ok(Vec::new());
        }
        if vector.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                found: vector.len(),
            });
        }

        let query_norm = magnitude(vector);
        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .zip(&self.norms)
            .map(|(entry, norm)| SearchHit {
                entry,
                similarity: similarity_with_norms(vector, query_norm, &entry.vector, *norm),
            })
            .collect();

        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, rank_order);
            hits.truncate(k);
        }
        hits.sort_by(rank_order);

        Ok(hits)
    }
}

/// Descending similarity, then ascending id.
fn rank_order(a: &SearchHit<'_>, b: &SearchHit<'_>) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.entry.id.cmp(&b.entry.id))
}

fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn similarity_with_norms(a: &[f32], norm_a: f32, b: &[f32], norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let similarity = dot / (norm_a * norm_b);
    if similarity.is_nan() {
        0.0
    } else {
        similarity
    }
}

/// Cosine similarity `(a·b)/(|a||b|)`.
///
/// Zero-magnitude inputs score 0.0; mismatched lengths score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    similarity_with_norms(a, magnitude(a), b, magnitude(b))
}
