//! Candidate retrieval from the search backend

use crate::config::{Config, FieldsConfig};
use crate::pipeline::query::build_query;
use crate::search::{RawHit, SearchClient, SearchError};
use serde_json::Value;
use std::sync::Arc;

/// A raw retrieved record, one per matched index entry
#[derive(Debug, Clone)]
pub struct CandidateHit {
    pub module_id: String,
    pub document_id: String,
    /// Lemmatized passage text, the input to chunking and reranking
    pub text_lemma: String,
    pub title_lemma: String,
    /// Backend relevance score for the raw hit
    pub score: f32,
    /// Full source mapping, carried through to the ranked result
    pub raw_source: serde_json::Map<String, Value>,
}

/// Fetches candidate hits for a query, capped at the configured maximum.
///
/// Errors are propagated, not absorbed: an `Err` means the backend was
/// unreachable, an empty `Ok` means the query matched nothing.
pub struct CandidateRetriever {
    client: Arc<dyn SearchClient>,
    fields: FieldsConfig,
    index: String,
    max_hits: usize,
}

impl CandidateRetriever {
    pub fn new(client: Arc<dyn SearchClient>, config: &Config) -> Self {
        Self {
            client,
            fields: config.fields.clone(),
            index: config.search.index.clone(),
            max_hits: config.limits.max_hits,
        }
    }

    pub async fn retrieve(
        &self,
        query_text: &str,
        alias: &str,
    ) -> Result<Vec<CandidateHit>, SearchError> {
        let query = build_query(query_text, alias, &self.fields);

        // Partial results are acceptable; min_score 0 sets no lower bound.
        let response = self
            .client
            .search(&self.index, &query, self.max_hits, true, 0.0)
            .await?;

        let hits: Vec<CandidateHit> = response
            .hits
            .hits
            .into_iter()
            .map(|hit| parse_hit(hit, &self.fields))
            .collect();

        tracing::info!(alias, hits = hits.len(), "Candidates retrieved");
        Ok(hits)
    }
}

/// Read a source field as a string, tolerating numeric ids and absent fields
fn source_str(source: &serde_json::Map<String, Value>, name: &str) -> String {
    match source.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn parse_hit(hit: RawHit, fields: &FieldsConfig) -> CandidateHit {
    CandidateHit {
        module_id: source_str(&hit.source, &fields.mod_id_name),
        document_id: source_str(&hit.source, &fields.doc_id_name),
        text_lemma: source_str(&hit.source, &fields.second_field),
        title_lemma: source_str(&hit.source, &fields.third_field),
        score: hit.score.unwrap_or(0.0),
        raw_source: hit.source,
    }
}
