//! Record domain model
//!
//! A record is the normalized unit of text plus metadata that flows from
//! corpus ingestion through indexing and back out as a query source.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Display form of a metadata field that has no value.
pub const MISSING_SENTINEL: &str = "N/A";

/// A single metadata value: either present text or the explicit missing sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum MetadataValue {
    Present(String),
    Missing,
}

impl MetadataValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Present(value) => value,
            Self::Missing => MISSING_SENTINEL,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<Option<String>> for MetadataValue {
    /// Blank strings (empty spreadsheet cells) count as missing.
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) if !text.trim().is_empty() => Self::Present(text),
            _ => Self::Missing,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Some(value.to_string()).into()
    }
}

impl From<MetadataValue> for Option<String> {
    fn from(value: MetadataValue) -> Self {
        match value {
            MetadataValue::Present(text) => Some(text),
            MetadataValue::Missing => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed metadata schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataKey {
    Tema,
    Pregunta,
    Respuesta,
    Source,
}

impl MetadataKey {
    pub const ALL: [Self; 4] = [Self::Tema, Self::Pregunta, Self::Respuesta, Self::Source];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tema => "tema",
            Self::Pregunta => "pregunta",
            Self::Respuesta => "respuesta",
            Self::Source => "source",
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    tema: MetadataValue,
    pregunta: MetadataValue,
    respuesta: MetadataValue,
    source: MetadataValue,
}

impl RecordMetadata {
    pub fn new(
        tema: impl Into<MetadataValue>,
        pregunta: impl Into<MetadataValue>,
        respuesta: impl Into<MetadataValue>,
        source: impl Into<MetadataValue>,
    ) -> Self {
        Self {
            tema: tema.into(),
            pregunta: pregunta.into(),
            respuesta: respuesta.into(),
            source: source.into(),
        }
    }

    pub fn get(&self, key: MetadataKey) -> &MetadataValue {
        match key {
            MetadataKey::Tema => &self.tema,
            MetadataKey::Pregunta => &self.pregunta,
            MetadataKey::Respuesta => &self.respuesta,
            MetadataKey::Source => &self.source,
        }
    }

    pub fn tema(&self) -> &MetadataValue {
        &self.tema
    }

    pub fn pregunta(&self) -> &MetadataValue {
        &self.pregunta
    }

    pub fn respuesta(&self) -> &MetadataValue {
        &self.respuesta
    }

    pub fn source(&self) -> &MetadataValue {
        &self.source
    }

    /// Metadata as a `key → text` map; missing values render as the sentinel.
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        MetadataKey::ALL
            .iter()
            .map(|key| (key.as_str(), self.get(*key).as_str().to_string()))
            .collect()
    }
}

/// A raw corpus row as handed over by the ingestion collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub tema: Option<String>,
    #[serde(default)]
    pub pregunta: Option<String>,
    #[serde(default)]
    pub respuesta: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Normalized text + metadata unit. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    content: String,
    metadata: RecordMetadata,
}

impl Record {
    pub fn new(content: impl Into<String>, metadata: RecordMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Normalize a raw Q/A row.
    ///
    /// The content combines topic, question and answer so the embedding sees
    /// the full exchange. `default_source` is used when the row names none.
    pub fn from_row(row: RawRow, default_source: &str) -> Self {
        let metadata = RecordMetadata::new(
            row.tema,
            row.pregunta,
            row.respuesta,
            row.source.or_else(|| Some(default_source.to_string())),
        );
        let content = format!(
            "Tema: {}\nPregunta: {}\nRespuesta: {}",
            metadata.tema, metadata.pregunta, metadata.respuesta
        );
        Self { content, metadata }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python_row() -> RawRow {
        RawRow {
            tema: Some("Python".to_string()),
            pregunta: Some("¿Qué es Python?".to_string()),
            respuesta: Some("Un lenguaje de programación.".to_string()),
            source: None,
        }
    }

    #[test]
    fn test_from_row_builds_combined_content() {
        let record = Record::from_row(python_row(), "corpus.json");
        assert_eq!(
            record.content(),
            "Tema: Python\nPregunta: ¿Qué es Python?\nRespuesta: Un lenguaje de programación."
        );
        assert_eq!(record.metadata().source().as_str(), "corpus.json");
    }

    #[test]
    fn test_missing_fields_use_sentinel() {
        let row = RawRow {
            tema: Some("RAG".to_string()),
            pregunta: None,
            respuesta: Some("   ".to_string()),
            source: Some("sheet".to_string()),
        };
        let record = Record::from_row(row, "ignored");

        assert!(record.metadata().pregunta().is_missing());
        assert!(record.metadata().respuesta().is_missing());
        assert_eq!(
            record.content(),
            "Tema: RAG\nPregunta: N/A\nRespuesta: N/A"
        );
        assert_eq!(record.metadata().source().as_str(), "sheet");
    }

    #[test]
    fn test_metadata_map_has_fixed_schema() {
        let record = Record::from_row(python_row(), "corpus.json");
        let map = record.metadata().to_map();

        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["pregunta", "respuesta", "source", "tema"]);
        assert_eq!(map["tema"], "Python");
    }

    #[test]
    fn test_metadata_value_serde() {
        let metadata = RecordMetadata::new("Python", None::<String>, "answer", "src");
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["pregunta"], serde_json::Value::Null);
        assert_eq!(json["tema"], "Python");

        let back: RecordMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, metadata);
    }
}
