pub mod embedding_service;
pub mod prompt_assembler;
pub mod query_orchestrator;
pub mod retriever;

pub use embedding_service::{EmbeddingService, EmbeddingServiceConfig};
pub use prompt_assembler::{assemble, AssembledPrompt};
pub use query_orchestrator::{OrchestratorSettings, QueryOrchestrator};
pub use retriever::{Retriever, DEFAULT_TOP_K};
