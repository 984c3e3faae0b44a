//! Askdoc Core Library
//!
//! Core functionality for the askdoc local PDF question-answering pipeline.
//!
//! # Features
//! - Sentence-aware chunking with configurable overlap
//! - In-memory embedding index with cosine-similarity retrieval
//! - Supervised lifecycle of a local Ollama inference runtime
//! - Retrieval-augmented prompting over a supervised model

pub mod config;
pub mod error;
pub mod index;
pub mod llm;
pub mod pipeline;
pub mod providers;
pub mod runtime;

pub use config::{
    ChunkingConfig, Config, DocumentsConfig, EmbeddingConfig, GenerationConfig, ReadinessConfig,
    RetrievalConfig, RuntimeConfig,
};
pub use error::{AskDocError, Error, Result};
pub use index::{cosine_similarity, Chunk, CorpusIndex, SearchHit};
pub use llm::{ChatMessage, Embedder, LlmClient, OllamaClient};
pub use pipeline::{build_prompt, Answer, QueryPipeline, RetrievedContext};
pub use providers::{load_documents, load_text, scan_directory, Document};
pub use runtime::{ModelInvoker, ModelState, ModelSupervisor};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "askdoc";
