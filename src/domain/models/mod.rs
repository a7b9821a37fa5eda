pub mod config;
pub mod prompt;
pub mod query;
pub mod record;

pub use config::{
    Config, EmbeddingConfig, LogFormat, LoggingConfig, PromptConfig, ProviderConfig,
    ProviderKind, RateLimitConfig, RetrievalConfig, RotationPolicy,
};
pub use prompt::{BudgetUnit, PromptBudget, PromptTemplate};
pub use query::{Answer, PipelineState, QueryResult, NO_ANSWER_TEXT};
pub use record::{MetadataKey, MetadataValue, RawRow, Record, RecordMetadata, MISSING_SENTINEL};
