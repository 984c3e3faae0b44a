//! Full pipeline: index documents, then answer questions interactively

use crate::app::RunArgs;
use askdoc_core::{
    AskDocError, Config, CorpusIndex, ModelSupervisor, OllamaClient, QueryPipeline, Result,
};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(args: RunArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(docs) = args.docs {
        config.documents.dir = docs;
    }
    if let Some(max_words) = args.max_words {
        config.chunking.max_words = max_words;
    }
    if let Some(overlap_words) = args.overlap_words {
        config.chunking.overlap_words = overlap_words;
    }
    if let Some(model) = args.model {
        config.runtime.model = model;
    }
    if let Some(top_k) = args.top_k {
        config.retrieval.top_k = top_k;
    }

    // Load and chunk before any model acquisition so an empty corpus
    // fails without a wasted download.
    let documents =
        askdoc_core::load_documents(&config.documents.dir, &config.documents.pattern)?;
    let chunks = QueryPipeline::chunk_documents(&documents, &config.chunking)?;
    println!(
        "Indexed {} documents into {} chunks",
        documents.len(),
        chunks.len()
    );

    let client = Arc::new(OllamaClient::new(
        &config.runtime,
        &config.embedding,
        &config.generation,
    )?);
    let mut supervisor = ModelSupervisor::new(config.runtime.clone(), client.clone());

    supervisor.start().await?;

    // Everything past this point owns a live runtime; stop it on any exit.
    let outcome = session(&mut supervisor, client, chunks, &config).await;
    supervisor.stop().await;
    outcome
}

async fn session(
    supervisor: &mut ModelSupervisor,
    client: Arc<OllamaClient>,
    chunks: Vec<askdoc_core::Chunk>,
    config: &Config,
) -> Result<()> {
    supervisor.wait_ready().await?;

    let pipeline = QueryPipeline::new(client.clone());
    let index = CorpusIndex::build(chunks, client.as_ref()).await?;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("Question: ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            line = lines.next_line() => line?,
        };

        let question = match line {
            Some(ref line) if !line.trim().is_empty() => line.trim().to_string(),
            Some(_) => continue,
            None => break,
        };

        match pipeline
            .answer(&index, &*supervisor, &question, config.retrieval.top_k)
            .await
        {
            Ok(answer) => {
                println!("\nRelevant context from the documents:");
                for context in &answer.context {
                    println!("{}", context.text);
                }
                println!("\nAnswer:\n{}\n", answer.text);
            }
            Err(AskDocError::InvokeFailed(e)) => {
                // A failed request degrades the answer, not the session
                println!("\nThe model could not be reached for this question: {e}\n");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
