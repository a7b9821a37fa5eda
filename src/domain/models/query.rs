//! Query-side domain models: pipeline state, answers and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::domain::errors::RagError;

/// Text shown when the model produced nothing.
pub const NO_ANSWER_TEXT: &str = "No se generó respuesta";

/// Setup state of the query orchestrator.
///
/// Variants are ordered: each state implies every earlier one was reached.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    Uninitialized,
    EmbeddingsReady,
    IndexReady,
    ModelReady,
    ChainReady,
}

impl PipelineState {
    /// State that must have been reached before entering `self`.
    pub const fn predecessor(self) -> Option<Self> {
        match self {
            Self::Uninitialized => None,
            Self::EmbeddingsReady => Some(Self::Uninitialized),
            Self::IndexReady => Some(Self::EmbeddingsReady),
            Self::ModelReady => Some(Self::IndexReady),
            Self::ChainReady => Some(Self::ModelReady),
        }
    }

    pub const fn is_ready(self) -> bool {
        matches!(self, Self::ChainReady)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::EmbeddingsReady => "embeddings_ready",
            Self::IndexReady => "index_ready",
            Self::ModelReady => "model_ready",
            Self::ChainReady => "chain_ready",
        };
        f.write_str(name)
    }
}

/// Output of the generative model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Answer {
    /// Text returned by the model, possibly whitespace.
    Text(String),
    /// The model returned an empty or absent response.
    NoAnswer,
}

impl Answer {
    /// Map raw model output; `None` and `""` become [`Answer::NoAnswer`].
    pub fn from_model_output(output: Option<String>) -> Self {
        match output {
            Some(text) if !text.is_empty() => Self::Text(text),
            _ => Self::NoAnswer,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::NoAnswer => None,
        }
    }

    pub fn is_no_answer(&self) -> bool {
        matches!(self, Self::NoAnswer)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::NoAnswer => f.write_str(NO_ANSWER_TEXT),
        }
    }
}

/// Result of a runtime query.
///
/// Query failures never surface as `Err`; they land in `diagnostic` and the
/// answer is [`Answer::NoAnswer`].
#[derive(Debug)]
pub struct QueryResult {
    pub answer: Answer,
    /// Records whose context blocks were placed in the prompt, in rank order.
    pub sources: Vec<Record>,
    pub diagnostic: Option<RagError>,
}

impl QueryResult {
    pub fn answered(answer: Answer, sources: Vec<Record>) -> Self {
        Self {
            answer,
            sources,
            diagnostic: None,
        }
    }

    pub fn failed(error: RagError) -> Self {
        Self {
            answer: Answer::NoAnswer,
            sources: Vec::new(),
            diagnostic: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostic.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_ordering() {
        assert!(PipelineState::Uninitialized < PipelineState::EmbeddingsReady);
        assert!(PipelineState::IndexReady < PipelineState::ModelReady);
        assert!(PipelineState::ModelReady < PipelineState::ChainReady);
        assert_eq!(
            PipelineState::ChainReady.predecessor(),
            Some(PipelineState::ModelReady)
        );
        assert_eq!(PipelineState::Uninitialized.predecessor(), None);
        assert!(PipelineState::ChainReady.is_ready());
        assert!(!PipelineState::ModelReady.is_ready());
    }

    #[test]
    fn test_answer_from_model_output() {
        assert_eq!(Answer::from_model_output(None), Answer::NoAnswer);
        assert_eq!(Answer::from_model_output(Some(String::new())), Answer::NoAnswer);
        assert_eq!(
            Answer::from_model_output(Some(" ".to_string())),
            Answer::Text(" ".to_string())
        );
        assert_eq!(Answer::NoAnswer.to_string(), NO_ANSWER_TEXT);
    }

    #[test]
    fn test_failed_result_carries_diagnostic() {
        let result = QueryResult::failed(RagError::EmptyQuestion);
        assert!(!result.is_ok());
        assert!(result.answer.is_no_answer());
        assert!(result.sources.is_empty());
    }
}
