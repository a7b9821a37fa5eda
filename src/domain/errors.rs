//! Domain errors for the qarag pipeline.

use std::path::PathBuf;

use thiserror::Error;

use super::models::PipelineState;

/// Errors raised by the index-build-and-query pipeline.
///
/// Setup-phase variants abort the operation that raised them. During
/// `query`, every failure is carried back inside
/// [`QueryResult::diagnostic`](super::models::QueryResult) instead of being
/// returned.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    #[error("Vector index has not been built")]
    NotBuilt,

    #[error("Vector dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Snapshot not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Snapshot at {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Snapshot write to {} failed: {source}", .path.display())]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pipeline not initialized: requires {required}, current state is {current}")]
    NotInitialized {
        required: PipelineState,
        current: PipelineState,
    },

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Query failed: {0}")]
    Query(Box<RagError>),
}

pub type RagResult<T> = Result<T, RagError>;

impl RagError {
    /// Build a provider error from anything displayable.
    pub fn provider(provider: impl Into<String>, message: impl ToString) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    /// Build a corrupt-snapshot error for `path`.
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether a snapshot load failure should fall back to building from a corpus.
    pub fn is_snapshot_failure(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Corrupt { .. } | Self::DimensionMismatch { .. }
        )
    }

    /// Wrap a failure that happened while answering a query.
    ///
    /// `NotInitialized` is kept as-is so callers can tell "not ready yet"
    /// apart from a failed query.
    pub fn into_query_error(self) -> Self {
        match self {
            Self::NotInitialized { .. } | Self::Query(_) => self,
            other => Self::Query(Box::new(other)),
        }
    }
}
