use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::prompt::{BudgetUnit, PromptBudget, PromptTemplate};

/// Main configuration structure for qarag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Embedding and generation provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Batch embedding orchestration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retrieval and snapshot settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Prompt template and budget
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Client-side rate limiting for provider calls
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which provider family backs embeddings and generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Generative Language API (embeddings + generation)
    #[default]
    Gemini,
    /// OpenAI-compatible embeddings, Gemini generation
    OpenAi,
    /// Offline hashing embedder, Gemini generation
    Hashing,
}

/// Provider configuration: `(model_name, api_key, temperature, embedding_model)`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    /// Generative model name
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Dimension produced by the embedding model
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Sampling temperature (0.0-2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// API key; falls back to `GOOGLE_API_KEY` / `OPENAI_API_KEY`.
    /// With `kind: openai` this is the OpenAI key and generation reads
    /// `GOOGLE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Override for the base URL of the `kind` provider
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model_name() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_embedding_model() -> String {
    "models/embedding-001".to_string()
}

const fn default_embedding_dimension() -> usize {
    768
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model_name: default_model_name(),
            embedding_model: default_embedding_model(),
            embedding_dimension: default_embedding_dimension(),
            temperature: default_temperature(),
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// API key for the generative model.
    pub fn generation_api_key(&self) -> Option<String> {
        let configured = match self.kind {
            ProviderKind::OpenAi => None,
            ProviderKind::Gemini | ProviderKind::Hashing => self.api_key.clone(),
        };
        configured
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Base URL override that applies to the Gemini generation endpoint.
    pub fn generation_base_url(&self) -> Option<&str> {
        match self.kind {
            ProviderKind::OpenAi => None,
            ProviderKind::Gemini | ProviderKind::Hashing => self.base_url.as_deref(),
        }
    }

    /// API key for the embedding provider.
    pub fn embedding_api_key(&self) -> Option<String> {
        match self.kind {
            ProviderKind::Gemini => self.generation_api_key(),
            ProviderKind::OpenAi => self
                .api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .filter(|key| !key.trim().is_empty()),
            ProviderKind::Hashing => None,
        }
    }
}

/// Batch embedding orchestration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Below this many texts, embed one call per text
    #[serde(default = "default_batch_threshold")]
    pub batch_threshold: usize,

    /// Maximum provider calls in flight during a batch
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

const fn default_batch_threshold() -> usize {
    5
}

const fn default_max_concurrency() -> usize {
    4
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            batch_threshold: default_batch_threshold(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Number of records retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Location of the persisted index snapshot
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

const fn default_top_k() -> usize {
    3
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(".qarag/index.json")
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

/// Prompt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PromptConfig {
    /// Maximum prompt size, in `budget_unit`
    #[serde(default = "default_budget")]
    pub budget: usize,

    #[serde(default)]
    pub budget_unit: BudgetUnit,

    #[serde(default)]
    pub template: PromptTemplate,
}

const fn default_budget() -> usize {
    12_000
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            budget_unit: BudgetUnit::default(),
            template: PromptTemplate::default(),
        }
    }
}

impl PromptConfig {
    pub const fn budget(&self) -> PromptBudget {
        PromptBudget {
            limit: self.budget,
            unit: self.budget_unit,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests per second allowed
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,

    /// Burst size for token bucket
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

const fn default_requests_per_second() -> f64 {
    10.0
}

const fn default_burst_size() -> u32 {
    20
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Directory for log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}
