//! Query-facing wrapper around a shared vector index.

use std::sync::Arc;

use crate::domain::errors::RagResult;
use crate::infrastructure::vector::{SearchHit, VectorIndex};

/// Default number of records retrieved per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Retrieves the `k` records closest to a query vector.
#[derive(Debug, Clone)]
pub struct Retriever {
    index: Arc<VectorIndex>,
    k: usize,
}

impl Retriever {
    pub fn new(index: Arc<VectorIndex>, k: usize) -> Self {
        Self { index, k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    /// Ranked hits, best first; at most `k`.
    pub fn retrieve(&self, query_vector: &[f32]) -> RagResult<Vec<SearchHit<'_>>> {
        self.index.query(query_vector, self.k)
    }
}
