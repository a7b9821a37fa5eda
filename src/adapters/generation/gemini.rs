//! Gemini generative model adapter (`:generateContent`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::adapters::embeddings::gemini::{model_resource, GEMINI_BASE_URL};
use crate::adapters::http::ProviderClient;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::config::ProviderConfig;
use crate::domain::models::Answer;
use crate::domain::ports::generation::GenerativeModel;

const PROVIDER: &str = "gemini";

/// Configuration for the Gemini generative model.
#[derive(Debug, Clone)]
pub struct GeminiGenerationConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Model resource name, e.g. `models/gemini-1.5-flash`.
    pub model: String,
    pub temperature: f32,
}

impl Default for GeminiGenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GEMINI_BASE_URL.to_string(),
            model: "models/gemini-1.5-flash".to_string(),
            temperature: 0.7,
        }
    }
}

impl GeminiGenerationConfig {
    pub fn from_provider(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.generation_api_key(),
            base_url: config
                .generation_base_url()
                .unwrap_or(GEMINI_BASE_URL)
                .to_string(),
            model: model_resource(&config.model_name),
            temperature: config.temperature,
        }
    }
}

/// Gemini generative model client.
pub struct GeminiGenerativeModel {
    config: GeminiGenerationConfig,
    client: ProviderClient,
}

impl GeminiGenerativeModel {
    pub fn new(config: GeminiGenerationConfig, client: ProviderClient) -> Self {
        Self { config, client }
    }

    fn api_key(&self) -> RagResult<&str> {
        self.config.api_key.as_deref().ok_or_else(|| {
            RagError::Configuration(
                "Gemini API key not set. Set GOOGLE_API_KEY or provider.api_key.".to_string(),
            )
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiGenerativeModel {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn check_ready(&self) -> RagResult<()> {
        self.api_key().map(|_| ())
    }

    async fn generate(&self, prompt: &str) -> RagResult<Answer> {
        let url = format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key()?);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let response: GenerateContentResponse =
            self.client.post_json(PROVIDER, request, &body).await?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(RagError::provider(
                PROVIDER,
                format!("prompt blocked: {reason}"),
            ));
        }

        Ok(Answer::from_model_output(response.text()))
    }
}

// -- Gemini API request/response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        Some(text)
    }
}
