//! Port trait definitions (Hexagonal Architecture)
//!
//! - EmbeddingProvider: text to vector
//! - GenerativeModel: prompt to answer
//!
//! Adapters under `crate::adapters` implement these against remote APIs.

pub mod embedding;
pub mod generation;

pub use embedding::EmbeddingProvider;
pub use generation::GenerativeModel;
