//! Askdoc CLI
//!
//! Retrieval-augmented question answering over local PDFs, backed by a
//! locally supervised Ollama runtime.

use clap::Parser;

mod app;
mod commands;

use app::{Cli, Commands, RunArgs};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    let result = match cli.command {
        Some(Commands::Run(args)) => commands::run::run(args).await,
        Some(Commands::Setup(args)) => commands::setup::run(args).await,
        None => commands::run::run(RunArgs::default()).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
