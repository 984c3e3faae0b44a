//! Acquisition-only mode: pull, launch, idle until interrupted

use crate::app::SetupArgs;
use askdoc_core::{Config, ModelSupervisor, OllamaClient, Result};
use std::sync::Arc;

pub async fn run(args: SetupArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(model) = args.model {
        config.runtime.model = model;
    }

    let client = Arc::new(OllamaClient::new(
        &config.runtime,
        &config.embedding,
        &config.generation,
    )?);
    let mut supervisor = ModelSupervisor::new(config.runtime.clone(), client);

    supervisor.start().await?;

    if let Err(e) = supervisor.wait_ready().await {
        supervisor.stop().await;
        return Err(e);
    }

    println!(
        "Runtime is serving {} at {}. Press Ctrl-C to stop.",
        config.runtime.model, config.runtime.url
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for interrupt: {e}");
    }

    supervisor.stop().await;
    Ok(())
}
