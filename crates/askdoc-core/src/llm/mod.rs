//! LLM integration
//!
//! Traits and the Ollama-backed implementation for:
//! - Embedding generation
//! - Single-turn chat completion
//! - Runtime health probing

mod client;
mod traits;

pub use client::OllamaClient;
pub use traits::{ChatMessage, Embedder, LlmClient};
