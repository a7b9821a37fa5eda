use std::path::Path;

use anyhow::Result;

use super::{build_orchestrator, initialize, load_and_summarize};
use crate::cli::output::{output, IndexOutput};
use crate::domain::models::Config;

/// Build the index from `corpus` and save the snapshot.
pub async fn execute(config: &Config, corpus: &Path, json: bool) -> Result<()> {
    let records = load_and_summarize(corpus, json).await?;

    let orchestrator = build_orchestrator(config)?;
    initialize(&orchestrator, Some(records), false, json).await?;

    output(
        &IndexOutput {
            records: orchestrator.index_len().await.unwrap_or(0),
            snapshot: orchestrator.snapshot_path().display().to_string(),
        },
        json,
    );
    Ok(())
}
