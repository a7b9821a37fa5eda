//! Index snapshot persistence.
//!
//! A snapshot is a single JSON document holding both halves of an index (the
//! vectors and their paired records) plus the embedding model and dimension
//! they were produced with. Writes go to a temporary file in the destination
//! directory and are renamed into place, so a reader never observes a
//! half-written snapshot.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::index::{IndexEntry, VectorIndex};
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::Record;

/// Current on-disk format version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    format_version: u32,
    embedding_model: &'a str,
    dimension: usize,
    created_at: DateTime<Utc>,
    vectors: Vec<&'a [f32]>,
    records: Vec<&'a Record>,
}

#[derive(Deserialize)]
struct SnapshotFile {
    format_version: u32,
    embedding_model: String,
    dimension: usize,
    created_at: DateTime<Utc>,
    vectors: Vec<Vec<f32>>,
    records: Vec<Record>,
}

/// Reads and writes index snapshots at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `index`, replacing any previous snapshot atomically.
    pub async fn save(&self, index: &VectorIndex, embedding_model: &str) -> RagResult<()> {
        if !index.is_built() {
            return Err(RagError::NotBuilt);
        }

        let snapshot = SnapshotRef {
            format_version: SNAPSHOT_FORMAT_VERSION,
            embedding_model,
            dimension: index.dimension(),
            created_at: Utc::now(),
            vectors: index.entries().iter().map(|e| e.vector.as_slice()).collect(),
            records: index.entries().iter().map(|e| &e.record).collect(),
        };
        let bytes = serde_json::to_vec(&snapshot).map_err(|e| RagError::SnapshotIo {
            path: self.path.clone(),
            source: std::io::Error::other(e),
        })?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| RagError::SnapshotIo {
                path: self.path.clone(),
                source: std::io::Error::other(format!("blocking task failed: {e}")),
            })??;

        tracing::info!(
            path = %self.path.display(),
            entries = index.len(),
            dimension = index.dimension(),
            "index snapshot saved"
        );
        Ok(())
    }

    /// Load a snapshot produced with an embedding model of `expected_dimension`.
    pub async fn load(
        &self,
        embedding_model: &str,
        expected_dimension: usize,
    ) -> RagResult<VectorIndex> {
        let path = self.path.clone();
        let bytes = tokio::task::spawn_blocking(move || read_snapshot(&path))
            .await
            .map_err(|e| RagError::corrupt(&self.path, format!("blocking task failed: {e}")))??;

        let snapshot: SnapshotFile = serde_json::from_slice(&bytes)
            .map_err(|e| RagError::corrupt(&self.path, e))?;

        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(RagError::corrupt(
                &self.path,
                format!("unsupported format version {}", snapshot.format_version),
            ));
        }
        if snapshot.vectors.len() != snapshot.records.len() {
            return Err(RagError::corrupt(
                &self.path,
                format!(
                    "{} vectors paired with {} records",
                    snapshot.vectors.len(),
                    snapshot.records.len()
                ),
            ));
        }
        if snapshot.dimension != expected_dimension {
            return Err(RagError::DimensionMismatch {
                expected: expected_dimension,
                found: snapshot.dimension,
            });
        }
        if let Some((position, vector)) = snapshot
            .vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != snapshot.dimension)
        {
            return Err(RagError::corrupt(
                &self.path,
                format!(
                    "vector {position} has dimension {}, header says {}",
                    vector.len(),
                    snapshot.dimension
                ),
            ));
        }
        if snapshot.embedding_model != embedding_model {
            tracing::warn!(
                snapshot_model = %snapshot.embedding_model,
                configured_model = %embedding_model,
                "snapshot was built with a different embedding model of the same dimension"
            );
        }

        let entries = snapshot
            .vectors
            .into_iter()
            .zip(snapshot.records)
            .enumerate()
            .map(|(id, (vector, record))| IndexEntry { id, vector, record })
            .collect::<Vec<_>>();

        tracing::info!(
            path = %self.path.display(),
            entries = entries.len(),
            dimension = snapshot.dimension,
            created_at = %snapshot.created_at,
            "index snapshot loaded"
        );

        Ok(VectorIndex::from_entries(snapshot.dimension, entries))
    }
}

fn read_snapshot(path: &Path) -> RagResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RagError::NotFound(path.to_path_buf())
        } else {
            RagError::corrupt(path, format!("unreadable: {e}"))
        }
    })
}

fn write_atomically(path: &Path, bytes: &[u8]) -> RagResult<()> {
    let io_err = |source: std::io::Error| RagError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
