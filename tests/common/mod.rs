//! Common test utilities for integration tests
//!
//! Mock providers with call counters and failure injection, plus corpus
//! fixtures shared across the integration test files.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use qarag::adapters::embeddings::HashingEmbeddingProvider;
use qarag::services::{OrchestratorSettings, QueryOrchestrator};
use qarag::{Answer, EmbeddingProvider, GenerativeModel, RagError, RagResult, RawRow, Record};

pub const DIMENSION: usize = 256;

/// Hashing embedder that counts calls and can be told to fail.
pub struct CountingEmbedder {
    inner: HashingEmbeddingProvider,
    pub single_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
    pub fail: AtomicBool,
    batch_delay_ms: AtomicU64,
}

impl CountingEmbedder {
    pub fn new() -> Self {
        Self {
            inner: HashingEmbeddingProvider::new(DIMENSION),
            single_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            batch_delay_ms: AtomicU64::new(0),
        }
    }

    /// Make every batch call sleep before answering.
    pub fn set_batch_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.batch_delay_ms.store(millis, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst) + self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> RagResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(RagError::provider("counting", "injected embedding failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.batch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.check()?;
        self.inner.embed_batch(texts).await
    }

    fn max_batch_size(&self) -> usize {
        self.inner.max_batch_size()
    }
}

impl Default for CountingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generative model that records every prompt it receives.
pub struct RecordingModel {
    pub prompts: Mutex<Vec<String>>,
    pub fail: AtomicBool,
    reply: Option<String>,
}

impl RecordingModel {
    pub fn new() -> Self {
        Self::replying(Some("Respuesta de prueba"))
    }

    pub fn replying(reply: Option<&str>) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            reply: reply.map(str::to_string),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl GenerativeModel for RecordingModel {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn model(&self) -> &str {
        "recording-model"
    }

    async fn generate(&self, prompt: &str) -> RagResult<Answer> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(RagError::provider("recording", "injected generation failure"));
        }
        Ok(Answer::from_model_output(self.reply.clone()))
    }
}

impl Default for RecordingModel {
    fn default() -> Self {
        Self::new()
    }
}

pub fn record(tema: &str, pregunta: &str, respuesta: &str) -> Record {
    Record::from_row(
        RawRow {
            tema: Some(tema.to_string()),
            pregunta: Some(pregunta.to_string()),
            respuesta: Some(respuesta.to_string()),
            source: None,
        },
        "fixture.json",
    )
}

pub fn sample_corpus() -> Vec<Record> {
    vec![
        record(
            "Python",
            "¿Qué es Python?",
            "Python es un lenguaje de programación interpretado de alto nivel.",
        ),
        record(
            "RAG",
            "¿Qué es RAG?",
            "RAG combina recuperación de documentos con generación de texto.",
        ),
        record(
            "FAISS",
            "¿Qué es FAISS?",
            "FAISS es una biblioteca para búsqueda eficiente de similitud vectorial.",
        ),
        record(
            "Embeddings",
            "¿Cómo funcionan los embeddings?",
            "Los embeddings representan texto como vectores densos.",
        ),
        record(
            "Gemini",
            "¿Qué es Gemini?",
            "Gemini es una familia de modelos generativos de Google.",
        ),
    ]
}

/// Orchestrator whose snapshot lives in `dir`.
pub fn orchestrator_with(
    dir: &TempDir,
    embedder: Arc<CountingEmbedder>,
    model: Arc<RecordingModel>,
    settings: OrchestratorSettings,
) -> QueryOrchestrator {
    let settings = OrchestratorSettings {
        snapshot_path: dir.path().join("index.json"),
        ..settings
    };
    QueryOrchestrator::new(embedder, model, settings)
}

pub fn orchestrator(
    dir: &TempDir,
    embedder: Arc<CountingEmbedder>,
    model: Arc<RecordingModel>,
) -> QueryOrchestrator {
    orchestrator_with(dir, embedder, model, OrchestratorSettings::default())
}
