mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use renso::{config, server};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "renso",
    version,
    about = "Japanese word-association API server backed by chiVe (word2vec) embeddings"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the model and start the HTTP API server
    Serve,
    /// Manage the chiVe model artifact
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download a chiVe model to ~/.renso/models/
    Download {
        /// chiVe release to fetch (defaults to the configured model)
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::RensoConfig::load()?;

    // Initialize tracing with the configured log level, logging to stderr.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            server::serve(config).await?;
        }
        Command::Model { action } => match action {
            ModelAction::Download { model } => {
                cli::model_download(&config.model, model.as_deref()).await?;
            }
        },
    }

    Ok(())
}
