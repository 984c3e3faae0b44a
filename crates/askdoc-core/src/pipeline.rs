//! End-to-end query pipeline
//!
//! Composes loading, chunking, embedding, retrieval and model invocation.
//! The pipeline itself performs no interactive I/O; the caller supplies the
//! question and decides what to do with the answer.

use crate::config::ChunkingConfig;
use crate::error::{AskDocError, Result};
use crate::index::{chunker, Chunk, CorpusIndex};
use crate::llm::Embedder;
use crate::providers::Document;
use crate::runtime::ModelInvoker;
use std::sync::Arc;

/// A chunk retrieved as context for a question
#[derive(Debug, Clone)]
pub struct RetrievedContext {
    pub chunk_index: usize,
    pub score: f32,
    pub text: String,
}

/// The model's reply plus the context it was shown
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub context: Vec<RetrievedContext>,
}

/// Drives corpus construction and question answering
pub struct QueryPipeline {
    embedder: Arc<dyn Embedder>,
}

impl QueryPipeline {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Chunk all documents into one corpus-wide ordered sequence.
    ///
    /// Chunk indices are renumbered across documents so a search hit maps
    /// back to the right chunk. Fails with `NoDocuments` on an empty
    /// document set and `NoChunksExtracted` when no document yields text.
    pub fn chunk_documents(
        documents: &[Document],
        chunking: &ChunkingConfig,
    ) -> Result<Vec<Chunk>> {
        if documents.is_empty() {
            return Err(AskDocError::NoDocuments("empty document set".to_string()));
        }

        let mut chunks: Vec<Chunk> = Vec::new();
        for document in documents {
            for chunk in chunker::split(&document.text, chunking.max_words, chunking.overlap_words)
            {
                chunks.push(Chunk {
                    text: chunk.text,
                    source_index: chunks.len(),
                });
            }
        }

        if chunks.is_empty() {
            return Err(AskDocError::NoChunksExtracted);
        }

        tracing::info!(
            "Chunked {} documents into {} chunks",
            documents.len(),
            chunks.len()
        );
        Ok(chunks)
    }

    /// Chunk and embed the document set into a searchable index
    pub async fn build_corpus(
        &self,
        documents: &[Document],
        chunking: &ChunkingConfig,
    ) -> Result<CorpusIndex> {
        let chunks = Self::chunk_documents(documents, chunking)?;
        CorpusIndex::build(chunks, self.embedder.as_ref()).await
    }

    /// Answer a question against a built index.
    ///
    /// Embeds the question, retrieves the `top_k` most similar chunks,
    /// builds the augmented prompt and invokes the model once.
    pub async fn answer(
        &self,
        index: &CorpusIndex,
        invoker: &dyn ModelInvoker,
        question: &str,
        top_k: usize,
    ) -> Result<Answer> {
        let query_embedding = self.embedder.embed(question).await?;
        let hits = index.search(&query_embedding, top_k.max(1))?;

        let context: Vec<RetrievedContext> = hits
            .into_iter()
            .filter_map(|hit| {
                index.chunk(hit.chunk_index).map(|chunk| RetrievedContext {
                    chunk_index: hit.chunk_index,
                    score: hit.score,
                    text: chunk.text.clone(),
                })
            })
            .collect();

        let prompt = build_prompt(&context, question);
        tracing::debug!("Invoking model with {} context chunks", context.len());
        let text = invoker.invoke(&prompt).await?;

        Ok(Answer { text, context })
    }
}

/// Build the augmented prompt: retrieved context verbatim, then the
/// literal question.
pub fn build_prompt(context: &[RetrievedContext], question: &str) -> String {
    let context_text = context
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Use the following context from the documents to answer the question:\n\n\
         Context: {context_text}\n\n\
         Question: {question}\n\n\
         Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_context_verbatim_then_question() {
        let context = vec![RetrievedContext {
            chunk_index: 3,
            score: 0.9,
            text: "The warranty lasts two years.".to_string(),
        }];
        let prompt = build_prompt(&context, "How long is the warranty?");

        let context_pos = prompt.find("The warranty lasts two years.").unwrap();
        let question_pos = prompt.find("How long is the warranty?").unwrap();
        assert!(context_pos < question_pos);
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_chunk_documents_renumbers_across_documents() {
        let documents = vec![
            Document {
                path: "a.pdf".into(),
                text: "First doc sentence one. First doc sentence two.".to_string(),
            },
            Document {
                path: "b.pdf".into(),
                text: "Second doc sentence.".to_string(),
            },
        ];
        let chunking = ChunkingConfig {
            max_words: 4,
            overlap_words: 0,
        };

        let chunks = QueryPipeline::chunk_documents(&documents, &chunking).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.source_index, i);
        }
        assert!(chunks.len() >= 3);
    }

    #[test]
    fn test_chunk_documents_empty_set_fails() {
        let chunking = ChunkingConfig::default();
        let result = QueryPipeline::chunk_documents(&[], &chunking);
        assert!(matches!(result, Err(AskDocError::NoDocuments(_))));
    }

    #[test]
    fn test_chunk_documents_all_blank_fails() {
        let documents = vec![Document {
            path: "scan.pdf".into(),
            text: "   \n \t ".to_string(),
        }];
        let result = QueryPipeline::chunk_documents(&documents, &ChunkingConfig::default());
        assert!(matches!(result, Err(AskDocError::NoChunksExtracted)));
    }
}
