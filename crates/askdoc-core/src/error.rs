//! Error types for askdoc

use thiserror::Error;

/// Result type alias using AskDocError
pub type Result<T> = std::result::Result<T, AskDocError>;

/// Error type alias for convenience
pub type Error = AskDocError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const EMPTY_CORPUS: i32 = 2;
    pub const RUNTIME_FAILED: i32 = 3;
}

/// Main error type for askdoc
#[derive(Debug, Error)]
pub enum AskDocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No documents found: {0}")]
    NoDocuments(String),

    #[error("No text chunks extracted from any document")]
    NoChunksExtracted,

    #[error("Search attempted against an empty corpus index")]
    EmptyCorpus,

    #[error("Model acquisition failed: {0}")]
    AcquisitionFailed(String),

    #[error("Inference runtime did not become ready within {0}s")]
    ReadinessTimeout(u64),

    #[error("Model invocation failed: {0}")]
    InvokeFailed(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AskDocError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoDocuments(_) | Self::NoChunksExtracted => exit_codes::EMPTY_CORPUS,
            Self::AcquisitionFailed(_) | Self::ReadinessTimeout(_) => exit_codes::RUNTIME_FAILED,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
