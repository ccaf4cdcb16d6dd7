use std::path::PathBuf;
use thiserror::Error;

use crate::search::SearchError;

/// Main error type for the lexrank pipeline
#[derive(Error, Debug)]
pub enum LexrankError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// Bad sliding-window parameters (caller bug, fatal to that call)
    #[error("Invalid window configuration: window_size={window_size}, overlap={overlap}")]
    InvalidWindow { window_size: usize, overlap: usize },

    /// Candidate retrieval failed at the search backend.
    ///
    /// Distinct from an empty hit list: `Ok(vec![])` means "no matches",
    /// this variant means the backend was unreachable or rejected the request.
    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] SearchError),

    /// Cross-encoder call exceeded its deadline; no partial scores are returned
    #[error("Reranking timed out after {elapsed_secs}s")]
    RerankTimeout { elapsed_secs: u64 },

    /// Reranker model failure (initialization or scoring)
    #[error("Reranking failed: {0}")]
    Rerank(String),

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for lexrank operations
pub type Result<T> = std::result::Result<T, LexrankError>;
