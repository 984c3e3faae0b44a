//! Integration tests for the query pipeline
//!
//! Runs the chunk -> embed -> retrieve -> invoke flow end to end over mock
//! embedding and invocation backends; no network or runtime required.

use askdoc_core::{
    build_prompt, AskDocError, ChunkingConfig, Document, Embedder, ModelInvoker, QueryPipeline,
    Result,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Embeds text as keyword-presence vectors so retrieval is deterministic
struct KeywordEmbedder {
    keywords: Vec<&'static str>,
}

impl KeywordEmbedder {
    fn new() -> Self {
        Self {
            keywords: vec!["sky", "ocean", "mountain", "warranty"],
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .map(|kw| if lower.contains(kw) { 1.0 } else { 0.0 })
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.keywords.len()
    }

    fn model_name(&self) -> &str {
        "keyword-mock"
    }
}

/// Records prompts and returns a canned reply
struct RecordingInvoker {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingInvoker {
    fn new() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ModelInvoker for RecordingInvoker {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            Err(AskDocError::InvokeFailed("connection refused".to_string()))
        } else {
            Ok("mock answer".to_string())
        }
    }
}

fn corpus_documents() -> Vec<Document> {
    vec![
        Document {
            path: "nature.pdf".into(),
            text: "The sky is blue on clear days. The ocean covers most of the planet. \
                   The mountain range stretches for miles."
                .to_string(),
        },
        Document {
            path: "manual.pdf".into(),
            text: "The warranty lasts two years from purchase.".to_string(),
        },
    ]
}

fn small_chunking() -> ChunkingConfig {
    ChunkingConfig {
        max_words: 8,
        overlap_words: 0,
    }
}

#[tokio::test]
async fn test_retrieval_selects_matching_chunk() {
    let pipeline = QueryPipeline::new(Arc::new(KeywordEmbedder::new()));
    let index = pipeline
        .build_corpus(&corpus_documents(), &small_chunking())
        .await
        .unwrap();
    let invoker = RecordingInvoker::new();

    let answer = pipeline
        .answer(&index, &invoker, "How long is the warranty?", 1)
        .await
        .unwrap();

    assert_eq!(answer.text, "mock answer");
    assert_eq!(answer.context.len(), 1);
    assert!(answer.context[0].text.contains("warranty"));
}

#[tokio::test]
async fn test_prompt_carries_retrieved_chunk_and_question() {
    let pipeline = QueryPipeline::new(Arc::new(KeywordEmbedder::new()));
    let index = pipeline
        .build_corpus(&corpus_documents(), &small_chunking())
        .await
        .unwrap();
    let invoker = RecordingInvoker::new();

    let answer = pipeline
        .answer(&index, &invoker, "What color is the sky?", 1)
        .await
        .unwrap();

    let prompt = invoker.last_prompt().unwrap();
    assert!(prompt.contains(&answer.context[0].text));
    assert!(prompt.contains("What color is the sky?"));
    assert_eq!(prompt, build_prompt(&answer.context, "What color is the sky?"));
}

#[tokio::test]
async fn test_index_is_reused_across_questions() {
    let pipeline = QueryPipeline::new(Arc::new(KeywordEmbedder::new()));
    let index = pipeline
        .build_corpus(&corpus_documents(), &small_chunking())
        .await
        .unwrap();
    let invoker = RecordingInvoker::new();

    let first = pipeline
        .answer(&index, &invoker, "Tell me about the ocean", 1)
        .await
        .unwrap();
    let second = pipeline
        .answer(&index, &invoker, "Tell me about the mountain", 1)
        .await
        .unwrap();

    assert!(first.context[0].text.contains("ocean"));
    assert!(second.context[0].text.contains("mountain"));
}

#[tokio::test]
async fn test_invoke_failure_surfaces_as_typed_error() {
    let pipeline = QueryPipeline::new(Arc::new(KeywordEmbedder::new()));
    let index = pipeline
        .build_corpus(&corpus_documents(), &small_chunking())
        .await
        .unwrap();
    let invoker = RecordingInvoker::failing();

    let result = pipeline
        .answer(&index, &invoker, "Anything about the sky?", 1)
        .await;

    assert!(matches!(result, Err(AskDocError::InvokeFailed(_))));
}

#[tokio::test]
async fn test_empty_document_set_fails_before_embedding() {
    let pipeline = QueryPipeline::new(Arc::new(KeywordEmbedder::new()));
    let result = pipeline.build_corpus(&[], &small_chunking()).await;
    assert!(matches!(result, Err(AskDocError::NoDocuments(_))));
}

#[tokio::test]
async fn test_text_free_documents_fail_with_no_chunks() {
    let pipeline = QueryPipeline::new(Arc::new(KeywordEmbedder::new()));
    let documents = vec![Document {
        path: "scanned.pdf".into(),
        text: String::new(),
    }];
    let result = pipeline.build_corpus(&documents, &small_chunking()).await;
    assert!(matches!(result, Err(AskDocError::NoChunksExtracted)));
}

#[tokio::test]
async fn test_top_k_returns_multiple_context_chunks() {
    let pipeline = QueryPipeline::new(Arc::new(KeywordEmbedder::new()));
    let index = pipeline
        .build_corpus(&corpus_documents(), &small_chunking())
        .await
        .unwrap();
    let invoker = RecordingInvoker::new();

    let answer = pipeline
        .answer(&index, &invoker, "sky and ocean", 2)
        .await
        .unwrap();

    assert_eq!(answer.context.len(), 2);
    // Hits come back best-first and every hit maps to a real chunk
    assert!(answer.context[0].score >= answer.context[1].score);
}
