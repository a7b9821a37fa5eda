//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qarag")]
#[command(about = "Retrieval-augmented answers over a Q/A corpus", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to .qarag/config.yaml + .qarag/local.yaml)
    #[arg(short, long, global = true, env = "QARAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the vector index from a corpus file and save the snapshot
    Index {
        /// Corpus file (JSON array or YAML list of rows)
        #[arg(long)]
        corpus: PathBuf,
    },

    /// Answer questions; runs the example questions when none are given
    Ask {
        #[command(flatten)]
        setup: SetupArgs,

        /// Questions to answer
        questions: Vec<String>,
    },

    /// Ask questions interactively
    Chat {
        #[command(flatten)]
        setup: SetupArgs,
    },
}

/// How the pipeline obtains its index.
#[derive(Args, Debug, Clone)]
pub struct SetupArgs {
    /// Corpus file used to build the index
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Load the saved index snapshot instead of rebuilding it
    #[arg(short = 'e', long)]
    pub use_existing_index: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_questions() {
        let cli = Cli::try_parse_from(["qarag", "ask", "-e", "¿Qué es RAG?", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Ask { setup, questions } => {
                assert!(setup.use_existing_index);
                assert!(setup.corpus.is_none());
                assert_eq!(questions, vec!["¿Qué es RAG?".to_string()]);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_index_requires_corpus() {
        assert!(Cli::try_parse_from(["qarag", "index"]).is_err());
    }
}
