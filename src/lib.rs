//! qarag - retrieval-augmented question answering over a Q/A corpus
//!
//! Corpus records are embedded into an in-memory vector index (optionally
//! persisted as a snapshot), the nearest records to a question are packed into
//! a size-bounded prompt, and a generative model answers from that context.
//!
//! # Architecture
//!
//! The crate follows Hexagonal Architecture:
//!
//! - **Domain Layer** (`domain`): records, prompt and query models, errors, ports
//! - **Service Layer** (`services`): embedding fan-out, retrieval, prompt
//!   assembly and the pipeline orchestrator
//! - **Adapters** (`adapters`): Gemini, OpenAI and offline hashing providers
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging,
//!   corpus files, vector index and snapshots
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use qarag::adapters::embeddings::HashingEmbeddingProvider;
//! use qarag::services::{OrchestratorSettings, QueryOrchestrator};
//!
//! # async fn run(generator: Arc<dyn qarag::GenerativeModel>, records: Vec<qarag::Record>) -> anyhow::Result<()> {
//! let orchestrator = QueryOrchestrator::new(
//!     Arc::new(HashingEmbeddingProvider::new(256)),
//!     generator,
//!     OrchestratorSettings::default(),
//! );
//! orchestrator.initialize(Some(records), false).await?;
//! let result = orchestrator.query("¿Qué es RAG?").await;
//! println!("{}", result.answer);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{RagError, RagResult};
pub use domain::models::{
    Answer, Config, PipelineState, PromptBudget, PromptTemplate, QueryResult, RawRow, Record,
    RecordMetadata,
};
pub use domain::ports::{EmbeddingProvider, GenerativeModel};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::vector::{SnapshotStore, VectorIndex};
pub use services::{QueryOrchestrator, Retriever};
