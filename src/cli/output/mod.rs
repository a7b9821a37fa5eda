//! CLI output formatting module
//!
//! Every command result has a human rendering and a JSON rendering; `--json`
//! picks the latter.

pub mod progress;
pub mod table;

use console::style;
use serde::Serialize;
use serde_json::json;

use crate::domain::models::{QueryResult, Record, NO_ANSWER_TEXT};
use crate::infrastructure::corpus::CorpusSummary;

pub use table::TableFormatter;

const RULE_WIDTH: usize = 70;

/// Characters of record content shown per source.
pub const SOURCE_PREVIEW_CHARS: usize = 200;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate to at most `max_chars` characters, appending "..." if truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// JSON form of a record.
#[derive(Debug, Serialize)]
pub struct SourceView {
    pub tema: String,
    pub pregunta: String,
    pub respuesta: String,
    pub source: String,
    pub content: String,
}

impl From<&Record> for SourceView {
    fn from(record: &Record) -> Self {
        let metadata = record.metadata();
        Self {
            tema: metadata.tema().to_string(),
            pregunta: metadata.pregunta().to_string(),
            respuesta: metadata.respuesta().to_string(),
            source: metadata.source().to_string(),
            content: record.content().to_string(),
        }
    }
}

/// A question together with its query result.
#[derive(Debug, Serialize)]
pub struct AnswerOutput {
    pub question: String,
    pub answer: Option<String>,
    pub sources: Vec<SourceView>,
    pub error: Option<String>,
}

impl AnswerOutput {
    pub fn new(question: &str, result: &QueryResult) -> Self {
        Self {
            question: question.to_string(),
            answer: result.answer.text().map(str::to_string),
            sources: result.sources.iter().map(SourceView::from).collect(),
            error: result.diagnostic.as_ref().map(ToString::to_string),
        }
    }
}

impl CommandOutput for AnswerOutput {
    fn to_human(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", rule()));
        out.push_str(&format!("{}\n", style("💡 RESPUESTA:").bold()));
        out.push_str(&format!("{}\n", rule()));
        out.push_str(self.answer.as_deref().unwrap_or(NO_ANSWER_TEXT));
        out.push('\n');

        if let Some(error) = &self.error {
            out.push_str(&format!("\n{} {error}\n", style("Error:").red().bold()));
        }

        if !self.sources.is_empty() {
            out.push_str(&format!("\n{}\n", rule()));
            out.push_str(&format!("{}\n", style("📚 DOCUMENTOS FUENTE UTILIZADOS:").bold()));
            out.push_str(&format!("{}\n", rule()));
        }
        for (position, source) in self.sources.iter().enumerate() {
            out.push_str(&format!("\n📄 Documento {}:\n", position + 1));
            out.push_str(&format!("   Tema: {}\n", source.tema));
            out.push_str(&format!("   Pregunta: {}\n", source.pregunta));
            out.push_str(&format!(
                "   Contenido: {}\n",
                truncate(&source.content, SOURCE_PREVIEW_CHARS)
            ));
        }
        out.push_str(&rule());
        out
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Summary of a loaded corpus.
#[derive(Debug, Serialize)]
pub struct CorpusSummaryOutput {
    pub total: usize,
    pub topics: Vec<String>,
    #[serde(skip)]
    summary: CorpusSummary,
}

impl CorpusSummaryOutput {
    pub fn new(summary: CorpusSummary) -> Self {
        Self {
            total: summary.total,
            topics: summary.topics.clone(),
            summary,
        }
    }
}

impl CommandOutput for CorpusSummaryOutput {
    fn to_human(&self) -> String {
        if self.total == 0 {
            return "No hay documentos para mostrar".to_string();
        }

        let mut out = String::new();
        out.push_str(&format!("{}\n", rule()));
        out.push_str(&format!("{}\n", style("RESUMEN DE DOCUMENTOS CARGADOS").bold()));
        out.push_str(&format!("{}\n", rule()));
        out.push_str(&format!("Total de documentos: {}\n", self.total));
        out.push_str(&format!("Temas únicos: {}\n", self.topics.len()));
        out.push_str(&format!("Temas: {}\n", self.topics.join(", ")));
        out.push_str(&TableFormatter::new().format_examples(&self.summary));
        out.push('\n');
        let remaining = self.summary.remaining();
        if remaining > 0 {
            out.push_str(&format!("... y {remaining} documentos más\n"));
        }
        out.push_str(&rule());
        out
    }

    fn to_json(&self) -> serde_json::Value {
        json!({
            "total": self.total,
            "topics": self.topics,
            "examples": self.summary.examples.iter().map(SourceView::from).collect::<Vec<_>>(),
        })
    }
}

/// Result of the `index` command.
#[derive(Debug, Serialize)]
pub struct IndexOutput {
    pub records: usize,
    pub snapshot: String,
}

impl CommandOutput for IndexOutput {
    fn to_human(&self) -> String {
        format!(
            "{} Indexed {} records into {}",
            style("✓").green(),
            self.records,
            self.snapshot
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RagError;
    use crate::domain::models::{Answer, RawRow};

    fn python() -> Record {
        Record::from_row(
            RawRow {
                tema: Some("Python".to_string()),
                pregunta: Some("¿Qué es Python?".to_string()),
                respuesta: Some("Un lenguaje.".to_string()),
                source: None,
            },
            "corpus.json",
        )
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("¿Qué tal?", 4), "¿Qué...");
    }

    #[test]
    fn test_answer_output_json() {
        let result = QueryResult::answered(Answer::Text("Un lenguaje.".to_string()), vec![python()]);
        let json = AnswerOutput::new("¿Qué es Python?", &result).to_json();

        assert_eq!(json["answer"], "Un lenguaje.");
        assert_eq!(json["sources"][0]["tema"], "Python");
        assert_eq!(json["sources"][0]["source"], "corpus.json");
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_failed_answer_shows_sentinel_and_error() {
        let result = QueryResult::failed(RagError::EmptyQuestion.into_query_error());
        let output = AnswerOutput::new("", &result);

        let human = output.to_human();
        assert!(human.contains(NO_ANSWER_TEXT));
        assert!(human.contains("Question is empty"));
        assert!(output.to_json()["answer"].is_null());
    }

    #[test]
    fn test_human_lists_sources() {
        let result = QueryResult::answered(Answer::NoAnswer, vec![python()]);
        let human = AnswerOutput::new("q", &result).to_human();
        assert!(human.contains("Documento 1:"));
        assert!(human.contains("DOCUMENTOS FUENTE UTILIZADOS"));
        assert!(human.contains("   Tema: Python"));
    }

    #[test]
    fn test_corpus_summary_output() {
        let summary = CorpusSummary::from_records(&[python()]);
        let output = CorpusSummaryOutput::new(summary);
        assert_eq!(output.to_json()["topics"][0], "Python");
        assert!(output.to_human().contains("Total de documentos: 1"));
    }
}
