//! Command handlers.

pub mod ask;
pub mod chat;
pub mod index;

use std::path::Path;

use anyhow::{Context, Result};

use crate::adapters::{embedding_provider, generative_model, ProviderClient};
use crate::cli::output::{output, CorpusSummaryOutput};
use crate::cli::{create_spinner, ProgressBarExt, SetupArgs};
use crate::domain::models::{Config, Record};
use crate::infrastructure::corpus::{load_corpus, CorpusSummary};
use crate::services::{OrchestratorSettings, QueryOrchestrator};

/// Wire the configured providers into a fresh orchestrator.
pub fn build_orchestrator(config: &Config) -> Result<QueryOrchestrator> {
    let client = ProviderClient::new(&config.provider, &config.rate_limit)
        .context("Failed to create provider HTTP client")?;

    Ok(QueryOrchestrator::new(
        embedding_provider(&config.provider, &client),
        generative_model(&config.provider, &client),
        OrchestratorSettings::from(config),
    ))
}

/// Load a corpus file and print its summary.
pub async fn load_and_summarize(path: &Path, json: bool) -> Result<Vec<Record>> {
    let records = load_corpus(path)
        .await
        .with_context(|| format!("Failed to load corpus {}", path.display()))?;

    // JSON mode keeps stdout to one document per result.
    if !json {
        output(
            &CorpusSummaryOutput::new(CorpusSummary::from_records(&records)),
            json,
        );
    }
    Ok(records)
}

/// Build an orchestrator and run every setup step behind a spinner.
pub async fn prepare(config: &Config, setup: &SetupArgs, json: bool) -> Result<QueryOrchestrator> {
    let corpus = match &setup.corpus {
        Some(path) => Some(load_and_summarize(path, json).await?),
        None => None,
    };

    let orchestrator = build_orchestrator(config)?;
    initialize(&orchestrator, corpus, setup.use_existing_index, json).await?;
    Ok(orchestrator)
}

async fn initialize(
    orchestrator: &QueryOrchestrator,
    corpus: Option<Vec<Record>>,
    use_existing_index: bool,
    json: bool,
) -> Result<()> {
    let spinner = create_spinner("Inicializando sistema RAG...", json);
    match orchestrator.initialize(corpus, use_existing_index).await {
        Ok(()) => {
            let records = orchestrator.index_len().await.unwrap_or(0);
            spinner.finish_success(format!("Sistema RAG listo ({records} documentos)"));
            Ok(())
        }
        Err(err) => {
            spinner.finish_error("No se pudo inicializar el sistema RAG");
            Err(err).context("Failed to initialize RAG pipeline")
        }
    }
}
