//! Per-document aggregation of scored chunks

use crate::config::{Config, SitesConfig};
use crate::pipeline::grouping::group_by_key;
use crate::pipeline::retrieval::CandidateHit;
use crate::pipeline::ScoredChunk;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// One ranked document surviving aggregation
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub document_id: String,
    pub module_id: String,
    /// Maximum relevance score among the document's scored chunks
    pub best_score: f32,
    /// Deep link into the tenant site
    pub link: String,
    /// Source mapping of the hit that produced the best chunk
    pub source_fields: serde_json::Map<String, Value>,
}

/// Collapses scored chunks back to their parent documents.
///
/// The alias-to-site map is an injected immutable value, not process state;
/// concurrent per-tenant invocations share it read-only.
pub struct Aggregator {
    alias_to_site: HashMap<String, String>,
    max_results: usize,
}

impl Aggregator {
    pub fn new(sites: &SitesConfig, max_results: usize) -> Self {
        Self {
            alias_to_site: sites.alias_to_site.clone(),
            max_results,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.sites, config.limits.results_quantity)
    }

    /// Group scored chunks by owner document, pick the top score per
    /// document, attach a deep link, and return results ordered by best
    /// score descending, truncated to the configured quantity.
    pub fn aggregate(
        &self,
        scored: Vec<ScoredChunk>,
        hits: &[CandidateHit],
        alias: &str,
    ) -> Vec<RankedResult> {
        let pairs: Vec<(String, ScoredChunk)> = scored
            .into_iter()
            .map(|sc| (hits[sc.chunk.hit_index].document_id.clone(), sc))
            .collect();

        let mut results: Vec<RankedResult> = group_by_key(pairs)
            .into_iter()
            .map(|(document_id, chunks)| {
                // ties keep the first-encountered chunk (stable group order)
                let best = chunks
                    .iter()
                    .reduce(|a, b| {
                        if b.relevance_score > a.relevance_score {
                            b
                        } else {
                            a
                        }
                    })
                    .unwrap();
                let owner = &hits[best.chunk.hit_index];

                RankedResult {
                    link: self.build_link(alias, &owner.module_id, &document_id),
                    document_id,
                    module_id: owner.module_id.clone(),
                    best_score: best.relevance_score,
                    source_fields: owner.raw_source.clone(),
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.best_score
                .partial_cmp(&a.best_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(self.max_results);
        results
    }

    /// `{site_address}?#/document/{mod_id}/{doc_id}/`; an unknown alias maps
    /// to an empty site address, not an error.
    fn build_link(&self, alias: &str, module_id: &str, document_id: &str) -> String {
        let site_address = self
            .alias_to_site
            .get(alias)
            .map(String::as_str)
            .unwrap_or("");
        format!("{}?#/document/{}/{}/", site_address, module_id, document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Chunk;
    use serde_json::json;

    fn hit(module_id: &str, document_id: &str) -> CandidateHit {
        CandidateHit {
            module_id: module_id.to_string(),
            document_id: document_id.to_string(),
            text_lemma: "текст документа".to_string(),
            title_lemma: String::new(),
            score: 1.0,
            raw_source: json!({ "mod_id": module_id, "doc_id": document_id })
                .as_object()
                .unwrap()
                .clone(),
        }
    }

    fn scored(hit_index: usize, ordinal: usize, score: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                hit_index,
                ordinal,
                words: vec!["слово".to_string()],
            },
            relevance_score: score,
        }
    }

    fn aggregator(max_results: usize) -> Aggregator {
        Aggregator::new(&Config::default().sites, max_results)
    }

    #[test]
    fn test_best_score_per_document() {
        let hits = vec![hit("1", "10"), hit("1", "20")];
        let scored = vec![
            scored(0, 0, 0.2),
            scored(0, 1, 0.9),
            scored(1, 0, 0.5),
            scored(0, 2, 0.4),
        ];

        let results = aggregator(10).aggregate(scored, &hits, "uss");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document_id, "10");
        assert_eq!(results[0].best_score, 0.9);
        assert_eq!(results[1].document_id, "20");
        assert_eq!(results[1].best_score, 0.5);
    }

    #[test]
    fn test_idempotent_on_deduplicated_input() {
        // one scored chunk per document: output mirrors input scores
        let hits = vec![hit("1", "10"), hit("2", "20"), hit("3", "30")];
        let scored_chunks = vec![scored(0, 0, 0.3), scored(1, 0, 0.8), scored(2, 0, 0.1)];

        let results = aggregator(10).aggregate(scored_chunks, &hits, "bss");
        assert_eq!(results.len(), 3);
        let mut by_doc: Vec<(&str, f32)> = results
            .iter()
            .map(|r| (r.document_id.as_str(), r.best_score))
            .collect();
        by_doc.sort_by(|a, b| a.0.cmp(b.0));
        assert_eq!(by_doc, vec![("10", 0.3), ("20", 0.8), ("30", 0.1)]);
    }

    #[test]
    fn test_link_construction() {
        let hits = vec![hit("99", "12345")];
        let results = aggregator(10).aggregate(vec![scored(0, 0, 0.7)], &hits, "uss");

        assert_eq!(results[0].link, "https://1jur.ru?#/document/99/12345/");
    }

    #[test]
    fn test_unknown_alias_yields_empty_site() {
        let hits = vec![hit("99", "12345")];
        let results = aggregator(10).aggregate(vec![scored(0, 0, 0.7)], &hits, "nope");

        assert_eq!(results[0].link, "?#/document/99/12345/");
    }

    #[test]
    fn test_ordered_and_truncated() {
        let hits = vec![hit("1", "10"), hit("1", "20"), hit("1", "30")];
        let scored_chunks = vec![scored(0, 0, 0.1), scored(1, 0, 0.9), scored(2, 0, 0.5)];

        let results = aggregator(2).aggregate(scored_chunks, &hits, "bss");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document_id, "20");
        assert_eq!(results[1].document_id, "30");
    }

    #[test]
    fn test_tie_keeps_first_encountered() {
        let hits = vec![hit("1", "10")];
        let scored_chunks = vec![scored(0, 0, 0.5), scored(0, 1, 0.5)];

        let results = aggregator(10).aggregate(scored_chunks, &hits, "bss");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].best_score, 0.5);
    }

}
