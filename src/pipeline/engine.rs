//! Pipeline orchestration: retrieve, chunk, rerank, aggregate

use crate::config::{Config, LimitsConfig};
use crate::error::Result;
use crate::pipeline::aggregate::Aggregator;
use crate::pipeline::chunker::sliding_window;
use crate::pipeline::reranker::{CrossEncoder, Reranker};
use crate::pipeline::retrieval::{CandidateHit, CandidateRetriever};
use crate::pipeline::similarity::jaccard;
use crate::pipeline::{AnswerResponse, Chunk, QueryRequest};
use crate::search::SearchClient;
use std::collections::HashMap;
use std::sync::Arc;

/// Linear per-request pipeline over external search and reranking models.
///
/// Holds no mutable state: concurrent invocations only share the clients
/// and the immutable configuration.
pub struct PipelineEngine {
    retriever: CandidateRetriever,
    reranker: Reranker,
    aggregator: Aggregator,
    limits: LimitsConfig,
}

impl PipelineEngine {
    pub fn new(
        client: Arc<dyn SearchClient>,
        encoder: Arc<dyn CrossEncoder>,
        config: &Config,
    ) -> Self {
        Self {
            retriever: CandidateRetriever::new(client, config),
            reranker: Reranker::new(encoder, &config.limits),
            aggregator: Aggregator::from_config(config),
            limits: config.limits.clone(),
        }
    }

    /// Answer a query: ranked, deduplicated, linkable documents.
    ///
    /// Zero hits and zero chunks are not errors and produce an empty list.
    /// Retrieval failures and rerank timeouts propagate as distinct errors.
    pub async fn answer(&self, request: &QueryRequest) -> Result<AnswerResponse> {
        let hits = self
            .retriever
            .retrieve(&request.query, &request.alias)
            .await?;
        if hits.is_empty() {
            tracing::info!(alias = %request.alias, "No candidates for query");
            return Ok(AnswerResponse::default());
        }

        let chunks = self.chunk_hits(&hits)?;
        if chunks.is_empty() {
            return Ok(AnswerResponse::default());
        }
        tracing::debug!(hits = hits.len(), chunks = chunks.len(), "Chunking done");

        let scored = self.reranker.rerank(&request.query, chunks).await?;

        let ranking_dicts = self.aggregator.aggregate(scored, &hits, &request.alias);
        tracing::info!(results = ranking_dicts.len(), "Pipeline finished");

        Ok(AnswerResponse { ranking_dicts })
    }

    /// Tokenize each hit's text and split long texts into overlapping
    /// windows; short texts pass through as a single chunk. Near-duplicate
    /// chunks of the same document are suppressed by Jaccard similarity.
    fn chunk_hits(&self, hits: &[CandidateHit]) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();
        let mut kept_texts: HashMap<&str, Vec<String>> = HashMap::new();

        for (hit_index, hit) in hits.iter().enumerate() {
            let words: Vec<String> = hit
                .text_lemma
                .split_whitespace()
                .map(String::from)
                .collect();
            if words.is_empty() {
                continue;
            }

            let windows = if words.len() > self.limits.max_sentences {
                sliding_window(
                    &words,
                    self.limits.sentences_chunk_size,
                    self.limits.sentences_overlap,
                )?
            } else {
                vec![words]
            };

            for (ordinal, window) in windows.into_iter().enumerate() {
                let text = window.join(" ");
                let kept = kept_texts.entry(hit.document_id.as_str()).or_default();
                if kept
                    .iter()
                    .any(|seen| jaccard(seen, &text) >= self.limits.dedup_jaccard)
                {
                    continue;
                }
                kept.push(text);
                chunks.push(Chunk {
                    hit_index,
                    ordinal,
                    words: window,
                });
            }
        }

        Ok(chunks)
    }
}
