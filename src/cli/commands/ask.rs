use anyhow::Result;

use super::prepare;
use crate::cli::output::{output, AnswerOutput};
use crate::cli::SetupArgs;
use crate::domain::models::Config;

/// Questions asked when none are given on the command line.
pub const EXAMPLE_QUESTIONS: [&str; 5] = [
    "¿Qué es Python y para qué se utiliza?",
    "Explícame qué es RAG",
    "¿Qué es FAISS?",
    "¿Cómo funcionan los embeddings?",
    "Háblame sobre Gemini",
];

/// Questions to run; the built-in example questions when none are given.
pub fn questions_or_examples(questions: Vec<String>) -> Vec<String> {
    if questions.is_empty() {
        EXAMPLE_QUESTIONS.iter().map(ToString::to_string).collect()
    } else {
        questions
    }
}

pub async fn execute(
    config: &Config,
    setup: &SetupArgs,
    questions: Vec<String>,
    json: bool,
) -> Result<()> {
    let orchestrator = prepare(config, setup, json).await?;

    for question in questions_or_examples(questions) {
        if !json {
            println!("\n❓ PREGUNTA: {question}");
        }
        let result = orchestrator.query(&question).await;
        output(&AnswerOutput::new(&question, &result), json);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_questions_runs_examples() {
        let questions = questions_or_examples(Vec::new());
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[1], "Explícame qué es RAG");
    }

    #[test]
    fn test_given_questions_are_kept() {
        let questions = questions_or_examples(vec!["¿Qué es RAG?".to_string()]);
        assert_eq!(questions, vec!["¿Qué es RAG?"]);
    }
}
