//! Prompt template and budget models.

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the user question in the footer.
pub const QUESTION_PLACEHOLDER: &str = "{question}";

/// Placeholder replaced by record content in a context block.
pub const CONTENT_PLACEHOLDER: &str = "{content}";

/// Placeholder replaced by the 1-based retrieval rank in a context block.
pub const RANK_PLACEHOLDER: &str = "{rank}";

/// Approximate characters per token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Unit used to measure a prompt against its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetUnit {
    /// Unicode scalar values.
    #[default]
    Chars,
    /// Estimated tokens at [`CHARS_PER_TOKEN`] characters per token.
    Tokens,
}

impl BudgetUnit {
    /// Size of `text` in this unit.
    pub fn measure(self, text: &str) -> usize {
        self.of_chars(text.chars().count())
    }

    /// Size, in this unit, of a text of `chars` Unicode scalar values.
    pub const fn of_chars(self, chars: usize) -> usize {
        match self {
            Self::Chars => chars,
            Self::Tokens => chars.div_ceil(CHARS_PER_TOKEN),
        }
    }
}

/// Maximum prompt size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBudget {
    pub limit: usize,
    pub unit: BudgetUnit,
}

impl PromptBudget {
    pub const fn chars(limit: usize) -> Self {
        Self {
            limit,
            unit: BudgetUnit::Chars,
        }
    }

    pub const fn tokens(limit: usize) -> Self {
        Self {
            limit,
            unit: BudgetUnit::Tokens,
        }
    }

    pub fn fits(&self, text: &str) -> bool {
        self.fits_chars(text.chars().count())
    }

    pub const fn fits_chars(&self, chars: usize) -> bool {
        self.unit.of_chars(chars) <= self.limit
    }
}

/// Template for the generation prompt: header, one block per record, footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplate {
    /// Fixed instruction header.
    pub header: String,
    /// Per-record block; supports `{content}` and `{rank}`.
    pub context_block: String,
    /// Question footer; must contain `{question}`.
    pub footer: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            header: "Usa el siguiente contexto para responder la pregunta al final.\n\
                     Si no sabes la respuesta, simplemente di que no lo sabes, no intentes inventar una respuesta.\n\
                     Responde de manera clara, concisa y útil.\n\n\
                     Contexto:\n"
                .to_string(),
            context_block: "{content}\n\n".to_string(),
            footer: "Pregunta: {question}\n\nRespuesta útil:".to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn render_block(&self, rank: usize, content: &str) -> String {
        self.context_block
            .replace(RANK_PLACEHOLDER, &rank.to_string())
            .replace(CONTENT_PLACEHOLDER, content)
    }

    pub fn render_footer(&self, question: &str) -> String {
        self.footer.replace(QUESTION_PLACEHOLDER, question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_chars_counts_scalars() {
        assert_eq!(BudgetUnit::Chars.measure("¿Qué?"), 5);
        assert_eq!(BudgetUnit::Chars.measure(""), 0);
    }

    #[test]
    fn test_measure_tokens_rounds_up() {
        assert_eq!(BudgetUnit::Tokens.measure(""), 0);
        assert_eq!(BudgetUnit::Tokens.measure("abc"), 1);
        assert_eq!(BudgetUnit::Tokens.measure("abcd"), 1);
        assert_eq!(BudgetUnit::Tokens.measure("abcde"), 2);
    }

    #[test]
    fn test_default_template_placeholders() {
        let template = PromptTemplate::default();
        assert!(template.footer.contains(QUESTION_PLACEHOLDER));
        assert!(template.context_block.contains(CONTENT_PLACEHOLDER));
        assert_eq!(template.render_block(2, "x"), "x\n\n");
        assert_eq!(
            template.render_footer("¿Qué es RAG?"),
            "Pregunta: ¿Qué es RAG?\n\nRespuesta útil:"
        );
    }

    #[test]
    fn test_budget_fits() {
        assert!(PromptBudget::chars(3).fits("abc"));
        assert!(!PromptBudget::chars(2).fits("abc"));
        assert!(PromptBudget::tokens(1).fits("abcd"));
    }
}
