//! Generative model adapters.

pub mod gemini;

use std::sync::Arc;

pub use gemini::{GeminiGenerationConfig, GeminiGenerativeModel};

use crate::adapters::http::ProviderClient;
use crate::domain::models::config::ProviderConfig;
use crate::domain::ports::GenerativeModel;

/// Build the generative model. Every provider kind generates with Gemini.
pub fn generative_model(config: &ProviderConfig, client: &ProviderClient) -> Arc<dyn GenerativeModel> {
    Arc::new(GeminiGenerativeModel::new(
        GeminiGenerationConfig::from_provider(config),
        client.clone(),
    ))
}
