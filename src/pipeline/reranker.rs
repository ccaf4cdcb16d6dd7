//! Cross-encoder reranking
//!
//! The model is consumed as an opaque scoring function over (query, passage)
//! pairs. Batches stay under a hard pair ceiling driven by accelerator
//! memory, and the whole scoring run is guarded by a deadline.

use crate::config::LimitsConfig;
use crate::error::{LexrankError, Result};
use crate::pipeline::{Chunk, ScoredChunk};
use fastembed::{RerankInitOptions, RerankerModel, TextRerank};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RerankError {
    #[error("Reranker initialization failed: {0}")]
    Initialization(String),

    #[error("Scoring failed: {0}")]
    Scoring(String),
}

/// Scoring capability of a cross-encoder model.
///
/// `score_batch` returns one relevance score per passage, in input order,
/// in the model's native output range. No normalization is applied.
pub trait CrossEncoder: Send + Sync {
    fn score_batch(&self, query: &str, passages: &[String]) -> std::result::Result<Vec<f32>, RerankError>;
}

/// Cross-encoder backed by a local fastembed rerank model
pub struct FastEmbedEncoder {
    model: TextRerank,
    model_name: String,
}

impl FastEmbedEncoder {
    pub fn new(model_name: &str) -> std::result::Result<Self, RerankError> {
        tracing::info!("Initializing reranker model: {}", model_name);

        let variant = match model_name {
            "BAAI/bge-reranker-v2-m3" => RerankerModel::BGERerankerV2M3,
            _ => RerankerModel::BGERerankerBase,
        };
        let init_options = RerankInitOptions::new(variant).with_show_download_progress(true);

        let model = TextRerank::try_new(init_options)
            .map_err(|e| RerankError::Initialization(e.to_string()))?;

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl CrossEncoder for FastEmbedEncoder {
    fn score_batch(&self, query: &str, passages: &[String]) -> std::result::Result<Vec<f32>, RerankError> {
        if passages.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<&str> = passages.iter().map(|s| s.as_str()).collect();
        let results = self
            .model
            .rerank(query, documents, false, None)
            .map_err(|e| RerankError::Scoring(e.to_string()))?;

        // fastembed returns results sorted by score; map back to input order
        let mut scores = vec![0.0_f32; passages.len()];
        for result in results {
            scores[result.index] = result.score;
        }
        Ok(scores)
    }
}

/// Scores chunks against the query and keeps the best candidates
pub struct Reranker {
    encoder: Arc<dyn CrossEncoder>,
    max_pairs: usize,
    rank_score: f32,
    quantity_total: usize,
    deadline: Duration,
}

impl Reranker {
    pub fn new(encoder: Arc<dyn CrossEncoder>, limits: &LimitsConfig) -> Self {
        Self {
            encoder,
            max_pairs: limits.dense_max_pairs,
            rank_score: limits.rank_score,
            quantity_total: limits.candidates_quantity_total,
            deadline: Duration::from_secs(limits.rerank_timeout_secs),
        }
    }

    /// Score chunks, drop those under the score floor, and keep the
    /// highest-scoring `candidates_quantity_total` across all documents.
    ///
    /// The scoring run executes on a blocking worker under a deadline. On
    /// expiry [`LexrankError::RerankTimeout`] is returned and the worker is
    /// abandoned; no partial score list is produced and the call is not
    /// retried.
    pub async fn rerank(&self, query_text: &str, chunks: Vec<Chunk>) -> Result<Vec<ScoredChunk>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let encoder = Arc::clone(&self.encoder);
        let query = query_text.to_string();
        let texts: Vec<String> = chunks.iter().map(|c| c.text()).collect();
        let max_pairs = self.max_pairs;

        let scoring =
            tokio::task::spawn_blocking(move || score_in_batches(&*encoder, &query, &texts, max_pairs));

        let scores = match tokio::time::timeout(self.deadline, scoring).await {
            Ok(joined) => joined
                .map_err(|e| LexrankError::Rerank(format!("Scoring task failed: {}", e)))?
                .map_err(|e| LexrankError::Rerank(e.to_string()))?,
            Err(_) => {
                return Err(LexrankError::RerankTimeout {
                    elapsed_secs: self.deadline.as_secs(),
                })
            }
        };

        if scores.len() != chunks.len() {
            return Err(LexrankError::Rerank(format!(
                "Model returned {} scores for {} passages",
                scores.len(),
                chunks.len()
            )));
        }

        let mut scored: Vec<ScoredChunk> = chunks
            .into_iter()
            .zip(scores)
            .filter(|(_, score)| *score >= self.rank_score)
            .map(|(chunk, relevance_score)| ScoredChunk {
                chunk,
                relevance_score,
            })
            .collect();

        // Global cut: best chunks across all documents, not per document
        scored.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.quantity_total);

        tracing::info!(kept = scored.len(), "Reranking finished");
        Ok(scored)
    }
}

/// Submit pairs in batches under the pair ceiling; scores concatenate in
/// original passage order.
fn score_in_batches(
    encoder: &dyn CrossEncoder,
    query: &str,
    texts: &[String],
    max_pairs: usize,
) -> std::result::Result<Vec<f32>, RerankError> {
    let mut scores = Vec::with_capacity(texts.len());
    for batch in texts.chunks(max_pairs) {
        scores.extend(encoder.score_batch(query, batch)?);
    }
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scores each passage by its position parity and records batch sizes
    struct RecordingEncoder {
        calls: AtomicUsize,
        batch_sizes: Mutex<Vec<usize>>,
    }

    impl RecordingEncoder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                batch_sizes: Mutex::new(Vec::new()),
            }
        }
    }

    impl CrossEncoder for RecordingEncoder {
        fn score_batch(
            &self,
            _query: &str,
            passages: &[String],
        ) -> std::result::Result<Vec<f32>, RerankError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.batch_sizes.lock().unwrap().push(passages.len());
            // score encodes the passage's own ordinal so order is verifiable
            Ok(passages
                .iter()
                .map(|p| p.trim_start_matches("passage ").parse::<f32>().unwrap())
                .collect())
        }
    }

    struct SlowEncoder;

    impl CrossEncoder for SlowEncoder {
        fn score_batch(
            &self,
            _query: &str,
            passages: &[String],
        ) -> std::result::Result<Vec<f32>, RerankError> {
            std::thread::sleep(Duration::from_secs(2));
            Ok(vec![0.0; passages.len()])
        }
    }

    fn chunk(ordinal: usize, text: &str) -> Chunk {
        Chunk {
            hit_index: 0,
            ordinal,
            words: text.split_whitespace().map(String::from).collect(),
        }
    }

    fn limits_with(max_pairs: usize) -> crate::config::LimitsConfig {
        let mut limits = Config::default().limits;
        limits.dense_max_pairs = max_pairs;
        limits
    }

    #[tokio::test]
    async fn test_batches_respect_pair_ceiling() {
        for (n, k) in [(7usize, 3usize), (10, 5), (4, 50), (9, 1)] {
            let encoder = Arc::new(RecordingEncoder::new());
            let reranker = Reranker::new(encoder.clone(), &limits_with(k));

            let chunks: Vec<Chunk> = (0..n).map(|i| chunk(i, &format!("passage {}", i))).collect();
            let scored = reranker.rerank("запрос", chunks).await.unwrap();

            assert_eq!(encoder.calls.load(Ordering::SeqCst), n.div_ceil(k));
            let sizes = encoder.batch_sizes.lock().unwrap();
            assert!(sizes.iter().all(|s| *s <= k));
            assert_eq!(sizes.iter().sum::<usize>(), n);
            assert_eq!(scored.len(), n);
        }
    }

    #[tokio::test]
    async fn test_scores_keep_original_pair_order() {
        let encoder = Arc::new(RecordingEncoder::new());
        let mut limits = limits_with(2);
        limits.rank_score = -10.0;
        limits.candidates_quantity_total = 500;
        let reranker = Reranker::new(encoder, &limits);

        let chunks: Vec<Chunk> = (0..5).map(|i| chunk(i, &format!("passage {}", i))).collect();
        let scored = reranker.rerank("q", chunks).await.unwrap();

        // output is sorted by score descending; the score of each chunk must
        // still be the one produced for that chunk, across batch boundaries
        for sc in &scored {
            assert_eq!(sc.relevance_score, sc.chunk.ordinal as f32);
        }
    }

    #[tokio::test]
    async fn test_score_floor_drops_chunks() {
        let encoder = Arc::new(RecordingEncoder::new());
        let mut limits = limits_with(50);
        limits.rank_score = 2.0;
        let reranker = Reranker::new(encoder, &limits);

        let chunks: Vec<Chunk> = (0..5).map(|i| chunk(i, &format!("passage {}", i))).collect();
        let scored = reranker.rerank("q", chunks).await.unwrap();

        assert_eq!(scored.len(), 3);
        assert!(scored.iter().all(|sc| sc.relevance_score >= 2.0));
    }

    #[tokio::test]
    async fn test_global_truncation() {
        let encoder = Arc::new(RecordingEncoder::new());
        let mut limits = limits_with(50);
        limits.candidates_quantity_total = 2;
        let reranker = Reranker::new(encoder, &limits);

        let chunks: Vec<Chunk> = (0..6).map(|i| chunk(i, &format!("passage {}", i))).collect();
        let scored = reranker.rerank("q", chunks).await.unwrap();

        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].relevance_score, 5.0);
        assert_eq!(scored[1].relevance_score, 4.0);
    }

    #[tokio::test]
    async fn test_empty_input_is_not_an_error() {
        let encoder = Arc::new(RecordingEncoder::new());
        let reranker = Reranker::new(encoder.clone(), &limits_with(10));

        let scored = reranker.rerank("q", Vec::new()).await.unwrap();
        assert!(scored.is_empty());
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_deadline_expiry_surfaces_timeout() {
        let mut limits = limits_with(10);
        limits.rerank_timeout_secs = 1;
        let reranker = Reranker::new(Arc::new(SlowEncoder), &limits);

        let result = reranker.rerank("q", vec![chunk(0, "passage 0")]).await;
        assert!(matches!(
            result,
            Err(LexrankError::RerankTimeout { elapsed_secs: 1 })
        ));
    }
}
