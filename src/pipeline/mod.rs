//! Candidate retrieval → chunking → reranking → aggregation pipeline
//!
//! The pipeline answers a tenant-scoped question by retrieving candidate
//! passages from the search backend, splitting long texts into overlapping
//! windows, scoring (query, passage) pairs with a cross-encoder and
//! collapsing the scored chunks back to linkable per-document results.

pub mod aggregate;
pub mod chunker;
pub mod grouping;
pub mod query;
pub mod retrieval;
pub mod similarity;

mod engine;
mod reranker;

pub use aggregate::{Aggregator, RankedResult};
pub use chunker::sliding_window;
pub use engine::PipelineEngine;
pub use grouping::group_by_key;
pub use query::build_query;
pub use reranker::{CrossEncoder, FastEmbedEncoder, RerankError, Reranker};
pub use retrieval::{CandidateHit, CandidateRetriever};
pub use similarity::{containment, jaccard};

use serde::{Deserialize, Serialize};

/// Incoming request: query text plus tenant alias
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub alias: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            alias: alias.into(),
        }
    }
}

/// Pipeline output: ranked per-document results
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnswerResponse {
    pub ranking_dicts: Vec<RankedResult>,
}

/// A bounded window of a hit's tokenized text.
///
/// `hit_index` back-references the owning candidate hit within the current
/// pipeline invocation. Windows of one hit are ordered by `ordinal` and may
/// overlap in words, never in ordinal.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub hit_index: usize,
    pub ordinal: usize,
    pub words: Vec<String>,
}

impl Chunk {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// A chunk with its cross-encoder relevance score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub relevance_score: f32,
}
