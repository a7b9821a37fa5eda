use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::prepare;
use crate::cli::output::{output, AnswerOutput};
use crate::cli::SetupArgs;
use crate::domain::models::Config;

const EXIT_WORDS: [&str; 4] = ["salir", "exit", "quit", "q"];

/// What to do with one line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatInput<'a> {
    Skip,
    Exit,
    Question(&'a str),
}

impl<'a> ChatInput<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Self::Skip
        } else if EXIT_WORDS.contains(&trimmed.to_lowercase().as_str()) {
            Self::Exit
        } else {
            Self::Question(trimmed)
        }
    }
}

/// Answer questions read from stdin until an exit word, EOF or Ctrl-C.
pub async fn execute(config: &Config, setup: &SetupArgs, json: bool) -> Result<()> {
    let orchestrator = prepare(config, setup, json).await?;

    if !json {
        println!("\n🤖 Modo interactivo. Escribe 'salir' para terminar.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !json {
            eprint!("\n❓ Tu pregunta: ");
        }

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read from stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match ChatInput::parse(&line) {
            ChatInput::Skip => continue,
            ChatInput::Exit => break,
            ChatInput::Question(question) => {
                let result = orchestrator.query(question).await;
                if let Some(err) = &result.diagnostic {
                    tracing::debug!(error = %err, "query failed; continuing");
                }
                output(&AnswerOutput::new(question, &result), json);
            }
        }
    }

    if !json {
        println!("\n👋 ¡Hasta luego!");
    }
    Ok(())
}
