//! Configuration management

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Document corpus configuration
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Inference runtime configuration
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Generation configuration
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Where to find source documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Directory scanned for documents
    pub dir: PathBuf,

    /// Glob pattern for files to load
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: std::env::var("ASKDOC_DOCS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("pdfs")),
            pattern: default_pattern(),
        }
    }
}

fn default_pattern() -> String {
    "**/*.pdf".to_string()
}

/// Chunking parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Word budget per chunk
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Trailing words carried into the next chunk
    #[serde(default = "default_overlap_words")]
    pub overlap_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
            overlap_words: default_overlap_words(),
        }
    }
}

fn default_max_words() -> usize {
    crate::index::chunker::DEFAULT_MAX_WORDS
}

fn default_overlap_words() -> usize {
    crate::index::chunker::DEFAULT_OVERLAP_WORDS
}

/// Local inference runtime (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Runtime binary used for pull/run
    #[serde(default = "default_runtime_bin")]
    pub bin: String,

    /// Model identifier to pull and serve
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the runtime's HTTP endpoint
    #[serde(default = "default_runtime_url")]
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Readiness detection
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bin: default_runtime_bin(),
            model: default_model(),
            url: default_runtime_url(),
            request_timeout_secs: default_request_timeout(),
            readiness: ReadinessConfig::default(),
        }
    }
}

fn default_runtime_bin() -> String {
    std::env::var("ASKDOC_RUNTIME_BIN").unwrap_or_else(|_| "ollama".to_string())
}

fn default_model() -> String {
    std::env::var("ASKDOC_MODEL").unwrap_or_else(|_| "deepseek-r1:7b".to_string())
}

fn default_runtime_url() -> String {
    std::env::var("ASKDOC_RUNTIME_URL").unwrap_or_else(|_| "http://localhost:11434".to_string())
}

fn default_request_timeout() -> u64 {
    120
}

/// How to decide the runtime is ready for requests.
///
/// With `probe` enabled the health endpoint is polled until it answers or
/// `timeout_secs` elapses. With `probe` disabled a fixed delay is used
/// instead; that is a heuristic, not a handshake, and exists for runtimes
/// without a usable health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Poll the health endpoint (fall back to a fixed delay when false)
    #[serde(default = "default_probe")]
    pub probe: bool,

    /// Give up polling after this many seconds
    #[serde(default = "default_readiness_timeout")]
    pub timeout_secs: u64,

    /// Interval between polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Fixed wait when probing is disabled
    #[serde(default = "default_fixed_delay")]
    pub fixed_delay_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            probe: default_probe(),
            timeout_secs: default_readiness_timeout(),
            poll_interval_ms: default_poll_interval(),
            fixed_delay_secs: default_fixed_delay(),
        }
    }
}

fn default_probe() -> bool {
    true
}

fn default_readiness_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    500
}

fn default_fixed_delay() -> u64 {
    5
}

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimensions (verified against the provider when set)
    #[serde(default)]
    pub dimensions: Option<usize>,

    /// Texts per embedding request
    #[serde(default = "default_embed_batch_size")]
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimensions: std::env::var("ASKDOC_EMBEDDING_DIMS")
                .ok()
                .and_then(|s| s.parse().ok()),
            batch_size: default_embed_batch_size(),
        }
    }
}

fn default_embedding_model() -> String {
    std::env::var("ASKDOC_EMBEDDING_MODEL").unwrap_or_else(|_| "nomic-embed-text".to_string())
}

fn default_embed_batch_size() -> usize {
    32
}

/// Retrieval parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Context chunks retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    1
}

/// Generation parameters passed through to the runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.chunking.max_words, 500);
        assert_eq!(config.chunking.overlap_words, 50);
        assert_eq!(config.retrieval.top_k, 1);
        assert!(config.runtime.readiness.probe);
        assert_eq!(config.runtime.readiness.fixed_delay_secs, 5);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "chunking:\n  max_words: 300\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.chunking.max_words, 300);
        assert_eq!(config.chunking.overlap_words, 50);
        assert_eq!(config.documents.pattern, "**/*.pdf");
    }
}
