//! Provider adapters for external model APIs.

pub mod embeddings;
pub mod generation;
pub mod http;

pub use embeddings::embedding_provider;
pub use generation::generative_model;
pub use http::ProviderClient;
