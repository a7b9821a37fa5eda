//! Generative model port.

use async_trait::async_trait;

use crate::domain::errors::RagResult;
use crate::domain::models::Answer;

/// A generative model that turns a prompt into an answer.
///
/// Transport and quota failures surface as `RagError::Provider` and are not
/// retried here. An empty or absent response is `Answer::NoAnswer`.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Provider name (e.g., "gemini").
    fn name(&self) -> &'static str;

    /// Model identifier.
    fn model(&self) -> &str;

    /// Verify the model is usable (credentials present, etc.).
    fn check_ready(&self) -> RagResult<()> {
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> RagResult<Answer>;
}
