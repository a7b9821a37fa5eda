//! qarag CLI entry point.

use anyhow::Result;
use clap::Parser;

use qarag::cli::{commands, Cli, Commands};
use qarag::infrastructure::config::ConfigLoader;
use qarag::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        qarag::cli::handle_error(err, cli.json);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&config.logging)?;

    match &cli.command {
        Commands::Index { corpus } => commands::index::execute(&config, corpus, cli.json).await,
        Commands::Ask { setup, questions } => {
            commands::ask::execute(&config, setup, questions.clone(), cli.json).await
        }
        Commands::Chat { setup } => commands::chat::execute(&config, setup, cli.json).await,
    }
}
