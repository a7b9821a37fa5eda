//! Vector infrastructure
//!
//! Exact cosine search over an in-memory index, plus snapshot persistence.

pub mod index;
pub mod snapshot;

pub use index::{cosine_similarity, IndexEntry, SearchHit, VectorIndex};
pub use snapshot::{SnapshotStore, SNAPSHOT_FORMAT_VERSION};
