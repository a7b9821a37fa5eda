//! Corpus file loading.
//!
//! A corpus file is a JSON array or YAML list of rows with optional `tema`,
//! `pregunta`, `respuesta` and `source` fields. Rows are normalized into
//! [`Record`]s; rows without a `source` are labelled with the file name.

use std::collections::BTreeSet;
use std::path::Path;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{RawRow, Record};

/// Number of example records kept in a [`CorpusSummary`].
pub const SUMMARY_EXAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CorpusFormat {
    Json,
    Yaml,
}

impl CorpusFormat {
    fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Load and normalize a corpus file.
///
/// An empty (or whitespace-only) file yields an empty corpus; index
/// construction then rejects it.
pub async fn load_corpus(path: impl AsRef<Path>) -> RagResult<Vec<Record>> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RagError::Corpus(format!("cannot read {}: {e}", path.display())))?;

    let source = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

    let records = parse_corpus(&text, CorpusFormat::from_path(path), &source)
        .map_err(|reason| RagError::Corpus(format!("malformed {}: {reason}", path.display())))?;

    tracing::info!(path = %path.display(), records = records.len(), "corpus loaded");
    Ok(records)
}

fn parse_corpus(text: &str, format: CorpusFormat, source: &str) -> Result<Vec<Record>, String> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<RawRow> = match format {
        CorpusFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string())?,
        CorpusFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string())?,
    };

    Ok(rows
        .into_iter()
        .map(|row| Record::from_row(row, source))
        .collect())
}

/// Overview of a loaded corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusSummary {
    pub total: usize,
    /// Unique topics, sorted.
    pub topics: Vec<String>,
    pub examples: Vec<Record>,
}

impl CorpusSummary {
    pub fn from_records(records: &[Record]) -> Self {
        let topics: BTreeSet<&str> = records
            .iter()
            .map(|record| record.metadata().tema().as_str())
            .collect();

        Self {
            total: records.len(),
            topics: topics.into_iter().map(str::to_string).collect(),
            examples: records.iter().take(SUMMARY_EXAMPLES).cloned().collect(),
        }
    }

    /// Records beyond the shown examples.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.examples.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JSON_CORPUS: &str = r#"[
        {"tema": "Python", "pregunta": "¿Qué es Python?", "respuesta": "Un lenguaje."},
        {"tema": "RAG", "pregunta": "¿Qué es RAG?", "respuesta": "Recuperación aumentada."},
        {"tema": "Python", "pregunta": "¿Quién creó Python?"},
        {"tema": "FAISS", "respuesta": "Búsqueda vectorial.", "source": "wiki"}
    ]"#;

    #[tokio::test]
    async fn test_load_json_corpus() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(JSON_CORPUS.as_bytes()).unwrap();

        let records = load_corpus(file.path()).await.unwrap();
        assert_eq!(records.len(), 4);
        assert!(records[2].metadata().respuesta().is_missing());
        assert_eq!(records[3].metadata().source().as_str(), "wiki");

        let file_name = file.path().file_name().unwrap().to_string_lossy();
        assert_eq!(records[0].metadata().source().as_str(), file_name);
    }

    #[tokio::test]
    async fn test_load_yaml_corpus() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "- tema: Gemini\n  pregunta: ¿Qué es Gemini?\n  respuesta: Un modelo.").unwrap();

        let records = load_corpus(file.path()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].content(),
            "Tema: Gemini\nPregunta: ¿Qué es Gemini?\nRespuesta: Un modelo."
        );
    }

    #[tokio::test]
    async fn test_empty_file_is_empty_corpus() {
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        assert!(load_corpus(file.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_and_missing_files() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{\"tema\": ").unwrap();
        assert!(matches!(
            load_corpus(file.path()).await,
            Err(RagError::Corpus(_))
        ));

        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            load_corpus(dir.path().join("absent.json")).await,
            Err(RagError::Corpus(_))
        ));
    }

    #[test]
    fn test_summary() {
        let records = parse_corpus(JSON_CORPUS, CorpusFormat::Json, "test").unwrap();
        let summary = CorpusSummary::from_records(&records);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.topics, vec!["FAISS", "Python", "RAG"]);
        assert_eq!(summary.examples.len(), SUMMARY_EXAMPLES);
        assert_eq!(summary.remaining(), 1);
    }
}
