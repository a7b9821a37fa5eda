//! Prompt assembly under a size budget.
//!
//! A prompt is the template header, one context block per retrieved record in
//! rank order, and the question footer. Blocks are atomic: when the prompt
//! would exceed the budget, whole blocks are dropped starting from the lowest
//! rank. The header and footer are always present, even if they alone exceed
//! the budget.

use crate::domain::models::prompt::{PromptBudget, PromptTemplate};
use crate::domain::models::Record;

/// A rendered prompt and how many ranked records made it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub text: String,
    /// Number of leading ranked records whose blocks were included.
    pub included: usize,
}

/// Assemble a prompt from `question` and `ranked` records (best first).
pub fn assemble<'a, I>(
    question: &str,
    ranked: I,
    template: &PromptTemplate,
    budget: PromptBudget,
) -> AssembledPrompt
where
    I: IntoIterator<Item = &'a Record>,
{
    let footer = template.render_footer(question);
    let mut used_chars = template.header.chars().count() + footer.chars().count();

    let mut blocks = String::new();
    let mut included = 0;
    for (position, record) in ranked.into_iter().enumerate() {
        let block = template.render_block(position + 1, record.content());
        let block_chars = block.chars().count();
        if !budget.fits_chars(used_chars + block_chars) {
            break;
        }
        used_chars += block_chars;
        blocks.push_str(&block);
        included += 1;
    }

    let mut text = String::with_capacity(template.header.len() + blocks.len() + footer.len());
    text.push_str(&template.header);
    text.push_str(&blocks);
    text.push_str(&footer);

    AssembledPrompt { text, included }
}
