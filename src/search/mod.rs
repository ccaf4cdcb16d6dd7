//! Search backend client
//!
//! The pipeline treats the inverted-index store as a capability: anything
//! implementing [`SearchClient`] can serve candidates. The production
//! implementation is an Elasticsearch HTTP client; tests substitute
//! in-memory fakes.

mod elastic;

pub use elastic::ElasticClient;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed backend response: {0}")]
    Body(String),

    #[error("Index not found: {0}")]
    IndexNotFound(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Transport(e.to_string())
    }
}

/// One matched record as returned by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_score", default)]
    pub score: Option<f32>,
    #[serde(rename = "_source", default)]
    pub source: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// Search response envelope; partial results are carried, not rejected
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: HitsEnvelope,
    #[serde(default)]
    pub timed_out: bool,
}

/// Outcome of a bulk indexing call
#[derive(Debug, Clone, Copy, Default)]
pub struct BulkSummary {
    pub indexed: usize,
    pub errors: usize,
}

/// Capability trait for the external search-index store
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Execute a structured query against an index.
    ///
    /// `allow_partial_results` asks the backend to return whatever subset is
    /// available on shard timeouts instead of failing the whole request.
    async fn search(
        &self,
        index: &str,
        query: &Value,
        size: usize,
        allow_partial_results: bool,
        min_score: f32,
    ) -> Result<SearchResponse, SearchError>;

    /// Index documents in bulk, batched by the configured chunk size
    async fn bulk_index(&self, index: &str, docs: &[Value]) -> Result<BulkSummary, SearchError>;

    /// Create an index
    async fn create_index(&self, index: &str) -> Result<(), SearchError>;

    /// Delete an index; deleting a missing index succeeds with a warning
    async fn delete_index(&self, index: &str) -> Result<(), SearchError>;
}
