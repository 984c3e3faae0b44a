//! HTTP client for the local Ollama runtime

use crate::config::{EmbeddingConfig, GenerationConfig, RuntimeConfig};
use crate::error::{AskDocError, Result};
use crate::llm::{ChatMessage, Embedder, LlmClient};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for Ollama's local HTTP endpoint.
///
/// Explicitly constructed and shared by reference; there is no process-wide
/// instance.
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
    chat_model: String,
    temperature: f32,
    embedding_model: String,
    embedding_dimensions: Option<usize>,
    embed_batch_size: usize,
}

impl OllamaClient {
    /// Create a new client from configuration
    pub fn new(
        runtime: &RuntimeConfig,
        embedding: &EmbeddingConfig,
        generation: &GenerationConfig,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(runtime.request_timeout_secs))
            .build()
            .map_err(AskDocError::Http)?;

        Ok(Self {
            http_client,
            base_url: runtime.url.trim_end_matches('/').to_string(),
            chat_model: runtime.model.clone(),
            temperature: generation.temperature,
            embedding_model: embedding.model.clone(),
            embedding_dimensions: embedding.dimensions,
            embed_batch_size: embedding.batch_size.max(1),
        })
    }

    /// Embed texts in parallel with multiple concurrent batch requests.
    ///
    /// Splits the input into request-sized batches and keeps a bounded
    /// number in flight; results come back in input order.
    pub async fn embed_batch_parallel(
        &self,
        texts: &[String],
        max_concurrent: usize,
    ) -> Result<Vec<Vec<f32>>> {
        let concurrent = max_concurrent.max(1);
        let batches: Vec<Vec<String>> =
            texts.chunks(self.embed_batch_size).map(|c| c.to_vec()).collect();
        let total_batches = batches.len();

        tracing::debug!(
            "Embedding {} texts in {} batches ({} concurrent)",
            texts.len(),
            total_batches,
            concurrent
        );

        let results: Vec<_> = stream::iter(batches)
            .enumerate()
            .map(|(idx, batch)| async move {
                let result = self.request_embeddings(&batch).await;
                (idx, result)
            })
            .buffer_unordered(concurrent)
            .collect()
            .await;

        let mut sorted_results = results;
        sorted_results.sort_by_key(|(idx, _)| *idx);

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for (_, result) in sorted_results {
            all_embeddings.extend(result?);
        }

        Ok(all_embeddings)
    }

    /// Issue one embedding request for a batch of texts
    async fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            input: &'a [String],
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            embeddings: Vec<Vec<f32>>,
        }

        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model: &self.embedding_model,
            input: texts,
        };

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AskDocError::InvokeFailed(format!(
                "embedding request failed (HTTP {status}): {body}"
            )));
        }

        let embed_response: EmbedResponse = response.json().await?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(AskDocError::InvokeFailed(format!(
                "embedding count mismatch: sent {}, got {}",
                texts.len(),
                embed_response.embeddings.len()
            )));
        }

        if let Some(expected) = self.embedding_dimensions {
            if let Some(vector) = embed_response.embeddings.first() {
                if vector.len() != expected {
                    return Err(AskDocError::Config(format!(
                        "embedding model '{}' produced {}-dimensional vectors, configured {}",
                        self.embedding_model,
                        vector.len(),
                        expected
                    )));
                }
            }
        }

        Ok(embed_response.embeddings)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        #[derive(Serialize)]
        struct ChatOptions {
            temperature: f32,
        }

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            stream: bool,
            options: ChatOptions,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            content: String,
        }

        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.chat_model,
            messages,
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AskDocError::InvokeFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AskDocError::InvokeFailed(format!(
                "chat request failed (HTTP {status}): {body}"
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AskDocError::InvokeFailed(e.to_string()))?;

        Ok(chat_response.message.content)
    }

    async fn health(&self) -> Result<()> {
        let response = self.http_client.get(format!("{}/", self.base_url)).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(AskDocError::InvokeFailed(format!(
                "runtime answered health check with HTTP {}",
                response.status()
            )))
        }
    }

    fn model_name(&self) -> &str {
        &self.chat_model
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.request_embeddings(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| AskDocError::InvokeFailed("no embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        const DEFAULT_CONCURRENT: usize = 4;
        self.embed_batch_parallel(texts, DEFAULT_CONCURRENT).await
    }

    fn dimensions(&self) -> usize {
        self.embedding_dimensions.unwrap_or(0)
    }

    fn model_name(&self) -> &str {
        &self.embedding_model
    }
}
