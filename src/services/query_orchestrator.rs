//! Query orchestrator: setup sequencing and runtime queries.
//!
//! Setup walks an explicit state machine,
//! `Uninitialized → EmbeddingsReady → IndexReady → ModelReady → ChainReady`.
//! Each step checks that its predecessor state was reached and re-running a
//! step rewinds the machine to that step, discarding later artifacts. A
//! failed step leaves the machine untouched.
//!
//! Setup is single-writer (guarded by a mutex). The ready chain is published
//! by swapping an `Arc` under a `RwLock`, so queries already in flight finish
//! on the index they started with.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::embedding_service::{EmbeddingService, EmbeddingServiceConfig};
use super::prompt_assembler::{self, AssembledPrompt};
use super::retriever::Retriever;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::config::Config;
use crate::domain::models::prompt::{PromptBudget, PromptTemplate};
use crate::domain::models::{PipelineState, QueryResult, Record};
use crate::domain::ports::{EmbeddingProvider, GenerativeModel};
use crate::infrastructure::vector::{SnapshotStore, VectorIndex};

/// Settings the orchestrator needs beyond its providers.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub top_k: usize,
    pub template: PromptTemplate,
    pub budget: PromptBudget,
    pub snapshot_path: PathBuf,
    pub embedding: EmbeddingServiceConfig,
}

impl From<&Config> for OrchestratorSettings {
    fn from(config: &Config) -> Self {
        Self {
            top_k: config.retrieval.top_k,
            template: config.prompt.template.clone(),
            budget: config.prompt.budget(),
            snapshot_path: config.retrieval.snapshot_path.clone(),
            embedding: EmbeddingServiceConfig::from(&config.embedding),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Everything a query needs, published atomically once setup completes.
struct Chain {
    retriever: Retriever,
    template: PromptTemplate,
    budget: PromptBudget,
}

struct Pipeline {
    state: PipelineState,
    index: Option<Arc<VectorIndex>>,
    chain: Option<Arc<Chain>>,
}

impl Pipeline {
    const fn new() -> Self {
        Self {
            state: PipelineState::Uninitialized,
            index: None,
            chain: None,
        }
    }

    /// Enter `state`, dropping artifacts of every later state.
    fn rewind_to(&mut self, state: PipelineState) {
        self.state = state;
        if state < PipelineState::IndexReady {
            self.index = None;
        }
        if state < PipelineState::ChainReady {
            self.chain = None;
        }
    }
}

/// Progress of an `initialize` run that has not been published yet.
#[derive(Default)]
struct Staged {
    state: PipelineState,
    index: Option<Arc<VectorIndex>>,
}

/// Sequences setup and answers queries.
pub struct QueryOrchestrator {
    embeddings: EmbeddingService,
    generator: Arc<dyn GenerativeModel>,
    snapshots: SnapshotStore,
    settings: OrchestratorSettings,
    pipeline: RwLock<Pipeline>,
    setup_lock: Mutex<()>,
}

impl QueryOrchestrator {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerativeModel>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            embeddings: EmbeddingService::new(embedder, settings.embedding.clone()),
            generator,
            snapshots: SnapshotStore::new(settings.snapshot_path.clone()),
            settings,
            pipeline: RwLock::new(Pipeline::new()),
            setup_lock: Mutex::new(()),
        }
    }

    pub async fn state(&self) -> PipelineState {
        self.pipeline.read().await.state
    }

    /// Number of records in the current index, if one is set up.
    pub async fn index_len(&self) -> Option<usize> {
        self.pipeline.read().await.index.as_ref().map(|index| index.len())
    }

    pub fn snapshot_path(&self) -> &std::path::Path {
        self.snapshots.path()
    }

    /// Run every setup step in order.
    ///
    /// With `use_existing_index`, a snapshot that is missing, corrupt or of the
    /// wrong dimension falls back to building from `corpus`. Without a usable
    /// snapshot, a corpus is required. A freshly built index is saved; a
    /// failed save only logs a warning.
    ///
    /// The new pipeline is staged off to the side and published in one write,
    /// so a ready pipeline keeps serving queries during the rebuild and stays
    /// in place if the rebuild fails. A pipeline that was not ready records
    /// the last state the failed run reached.
    pub async fn initialize(
        &self,
        corpus: Option<Vec<Record>>,
        use_existing_index: bool,
    ) -> RagResult<()> {
        let _setup = self.setup_lock.lock().await;
        info!(use_existing_index, "initializing RAG pipeline");

        let mut staged = Staged::default();
        let outcome = self
            .stage_pipeline(corpus, use_existing_index, &mut staged)
            .await;

        let mut pipeline = self.pipeline.write().await;
        match outcome {
            Ok(chain) => {
                pipeline.state = PipelineState::ChainReady;
                pipeline.index = staged.index;
                pipeline.chain = Some(chain);
                drop(pipeline);

                info!(snapshot = %self.snapshots.path().display(), "RAG pipeline ready");
                Ok(())
            }
            Err(err) if pipeline.state == PipelineState::ChainReady => {
                warn!(error = %err, "rebuild failed, keeping the current index");
                Err(err)
            }
            Err(err) => {
                pipeline.rewind_to(staged.state);
                pipeline.index = staged.index;
                Err(err)
            }
        }
    }

    async fn stage_pipeline(
        &self,
        corpus: Option<Vec<Record>>,
        use_existing_index: bool,
        staged: &mut Staged,
    ) -> RagResult<Arc<Chain>> {
        self.embeddings.check_ready()?;
        staged.state = PipelineState::EmbeddingsReady;

        let index = Arc::new(self.acquire_index(corpus, use_existing_index).await?);
        info!(entries = index.len(), "vector index staged");
        staged.index = Some(Arc::clone(&index));
        staged.state = PipelineState::IndexReady;

        self.generator.check_ready()?;
        staged.state = PipelineState::ModelReady;

        Ok(Arc::new(self.chain_for(index)))
    }

    pub async fn setup_embeddings(&self) -> RagResult<()> {
        let _setup = self.setup_lock.lock().await;
        self.setup_embeddings_locked().await
    }

    pub async fn setup_index(
        &self,
        corpus: Option<Vec<Record>>,
        use_existing_index: bool,
    ) -> RagResult<()> {
        let _setup = self.setup_lock.lock().await;
        self.setup_index_locked(corpus, use_existing_index).await
    }

    pub async fn setup_model(&self) -> RagResult<()> {
        let _setup = self.setup_lock.lock().await;
        self.setup_model_locked().await
    }

    pub async fn setup_chain(&self) -> RagResult<()> {
        let _setup = self.setup_lock.lock().await;
        self.setup_chain_locked().await
    }

    async fn require_predecessor(&self, step: PipelineState) -> RagResult<()> {
        let current = self.state().await;
        match step.predecessor() {
            Some(required) if current < required => {
                Err(RagError::NotInitialized { required, current })
            }
            _ => Ok(()),
        }
    }

    async fn setup_embeddings_locked(&self) -> RagResult<()> {
        self.require_predecessor(PipelineState::EmbeddingsReady)
            .await?;
        self.embeddings.check_ready()?;

        self.pipeline
            .write()
            .await
            .rewind_to(PipelineState::EmbeddingsReady);
        info!(
            provider = self.embeddings.provider_name(),
            model = self.embeddings.model(),
            dimension = self.embeddings.dimension(),
            "embeddings ready"
        );
        Ok(())
    }

    async fn setup_index_locked(
        &self,
        corpus: Option<Vec<Record>>,
        use_existing_index: bool,
    ) -> RagResult<()> {
        self.require_predecessor(PipelineState::IndexReady).await?;

        let index = self.acquire_index(corpus, use_existing_index).await?;

        let entries = index.len();
        let mut pipeline = self.pipeline.write().await;
        pipeline.rewind_to(PipelineState::IndexReady);
        pipeline.index = Some(Arc::new(index));
        drop(pipeline);

        info!(entries, "vector index ready");
        Ok(())
    }

    /// Load the snapshot or build from `corpus`, per the fallback policy.
    async fn acquire_index(
        &self,
        corpus: Option<Vec<Record>>,
        use_existing_index: bool,
    ) -> RagResult<VectorIndex> {
        let loaded = if use_existing_index {
            self.load_snapshot().await?
        } else {
            None
        };

        match (loaded, corpus) {
            (Some(index), _) => Ok(index),
            (None, Some(records)) => self.build_and_save(records).await,
            (None, None) => Err(RagError::Configuration(
                "no corpus provided and no usable index snapshot".to_string(),
            )),
        }
    }

    /// `Ok(None)` when the snapshot is unusable and a build should be attempted.
    async fn load_snapshot(&self) -> RagResult<Option<VectorIndex>> {
        match self
            .snapshots
            .load(self.embeddings.model(), self.embeddings.dimension())
            .await
        {
            Ok(index) => Ok(Some(index)),
            Err(err) if err.is_snapshot_failure() => {
                warn!(error = %err, "existing index unusable, falling back to corpus");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn build_and_save(&self, records: Vec<Record>) -> RagResult<VectorIndex> {
        if records.is_empty() {
            return Err(RagError::EmptyCorpus);
        }
        info!(records = records.len(), "building vector index");

        let texts: Vec<String> = records.iter().map(|r| r.content().to_string()).collect();
        let vectors = self.embeddings.embed_many(&texts).await?;
        let index = VectorIndex::build(vectors.into_iter().zip(records).collect())?;

        if let Err(err) = self.snapshots.save(&index, self.embeddings.model()).await {
            warn!(error = %err, "failed to save index snapshot");
        }
        Ok(index)
    }

    async fn setup_model_locked(&self) -> RagResult<()> {
        self.require_predecessor(PipelineState::ModelReady).await?;
        self.generator.check_ready()?;

        self.pipeline
            .write()
            .await
            .rewind_to(PipelineState::ModelReady);
        info!(
            provider = self.generator.name(),
            model = self.generator.model(),
            "generative model ready"
        );
        Ok(())
    }

    async fn setup_chain_locked(&self) -> RagResult<()> {
        self.require_predecessor(PipelineState::ChainReady).await?;

        let mut pipeline = self.pipeline.write().await;
        let index = pipeline.index.clone().ok_or(RagError::NotBuilt)?;
        pipeline.chain = Some(Arc::new(self.chain_for(index)));
        pipeline.state = PipelineState::ChainReady;
        drop(pipeline);

        info!(top_k = self.settings.top_k, "retrieval chain ready");
        Ok(())
    }

    fn chain_for(&self, index: Arc<VectorIndex>) -> Chain {
        Chain {
            retriever: Retriever::new(index, self.settings.top_k),
            template: self.settings.template.clone(),
            budget: self.settings.budget,
        }
    }

    /// Answer `question`.
    ///
    /// Never fails: a pipeline that is not ready yields a `NotInitialized`
    /// diagnostic, any other failure a `Query` diagnostic.
    pub async fn query(&self, question: &str) -> QueryResult {
        let chain = {
            let pipeline = self.pipeline.read().await;
            match (&pipeline.chain, pipeline.state) {
                (Some(chain), PipelineState::ChainReady) => Arc::clone(chain),
                (_, current) => {
                    return QueryResult::failed(RagError::NotInitialized {
                        required: PipelineState::ChainReady,
                        current,
                    })
                }
            }
        };

        match self.run_query(&chain, question).await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "query failed");
                QueryResult::failed(err.into_query_error())
            }
        }
    }

    async fn run_query(&self, chain: &Chain, question: &str) -> RagResult<QueryResult> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagError::EmptyQuestion);
        }

        let query_vector = self.embeddings.embed_single(question).await?;
        let hits = chain.retriever.retrieve(&query_vector)?;
        debug!(
            hits = hits.len(),
            top_similarity = hits.first().map(|hit| hit.similarity),
            "retrieved context"
        );

        let AssembledPrompt { text, included } = prompt_assembler::assemble(
            question,
            hits.iter().map(|hit| hit.record()),
            &chain.template,
            chain.budget,
        );
        if included < hits.len() {
            debug!(
                retrieved = hits.len(),
                included, "dropped context blocks to fit prompt budget"
            );
        }
        let sources: Vec<Record> = hits[..included]
            .iter()
            .map(|hit| hit.record().clone())
            .collect();

        let answer = self.generator.generate(&text).await?;
        Ok(QueryResult::answered(answer, sources))
    }
}
