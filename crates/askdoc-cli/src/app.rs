//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "askdoc")]
#[command(
    author,
    version,
    about = "Ask questions about local PDF documents with a locally supervised model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index documents and answer questions interactively (default)
    Run(RunArgs),

    /// Pull the model, launch the runtime and idle until interrupted
    Setup(SetupArgs),
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Directory containing PDF documents
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Word budget per chunk
    #[arg(long)]
    pub max_words: Option<usize>,

    /// Trailing words carried into the next chunk
    #[arg(long)]
    pub overlap_words: Option<usize>,

    /// Model identifier to pull and serve
    #[arg(long)]
    pub model: Option<String>,

    /// Context chunks retrieved per question
    #[arg(short = 'n', long)]
    pub top_k: Option<usize>,
}

#[derive(Args, Default)]
pub struct SetupArgs {
    /// Model identifier to pull and serve
    #[arg(long)]
    pub model: Option<String>,
}
