//! Elasticsearch HTTP client

use crate::config::SearchConfig;
use crate::search::{BulkSummary, SearchClient, SearchError, SearchResponse};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP client for an Elasticsearch-compatible backend
pub struct ElasticClient {
    http: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
    bulk_chunk_size: usize,
}

impl ElasticClient {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            bulk_chunk_size: config.bulk_chunk_size,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.username.is_empty() {
            req
        } else {
            req.basic_auth(&self.username, Some(&self.password))
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SearchError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(SearchError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl SearchClient for ElasticClient {
    async fn search(
        &self,
        index: &str,
        query: &Value,
        size: usize,
        allow_partial_results: bool,
        min_score: f32,
    ) -> Result<SearchResponse, SearchError> {
        let url = self.url(&format!(
            "{}/_search?allow_partial_search_results={}",
            index, allow_partial_results
        ));
        let body = json!({
            "query": query,
            "size": size,
            "min_score": min_score,
        });

        let resp = self
            .authorize(self.http.post(&url))
            .json(&body)
            .send()
            .await?;
        let resp = Self::check(resp).await?;

        let response: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::Body(e.to_string()))?;

        if response.timed_out {
            tracing::warn!(index, "Search timed out, returning partial results");
        }
        tracing::info!(index, hits = response.hits.hits.len(), "Search executed");

        Ok(response)
    }

    async fn bulk_index(&self, index: &str, docs: &[Value]) -> Result<BulkSummary, SearchError> {
        let url = self.url("_bulk");
        let mut summary = BulkSummary::default();

        for batch in docs.chunks(self.bulk_chunk_size) {
            let mut payload = String::new();
            for doc in batch {
                payload.push_str(&json!({"index": {"_index": index}}).to_string());
                payload.push('\n');
                payload.push_str(&doc.to_string());
                payload.push('\n');
            }

            let resp = self
                .authorize(self.http.post(&url))
                .header("Content-Type", "application/x-ndjson")
                .body(payload)
                .send()
                .await?;
            let resp = Self::check(resp).await?;

            let body: Value = resp
                .json()
                .await
                .map_err(|e| SearchError::Body(e.to_string()))?;
            let items = body["items"].as_array().cloned().unwrap_or_default();
            let failed = items
                .iter()
                .filter(|item| !item["index"]["error"].is_null())
                .count();

            summary.indexed += items.len() - failed;
            summary.errors += failed;
        }

        tracing::info!(
            index,
            indexed = summary.indexed,
            errors = summary.errors,
            "Bulk indexing finished"
        );
        Ok(summary)
    }

    async fn create_index(&self, index: &str) -> Result<(), SearchError> {
        let resp = self
            .authorize(self.http.put(&self.url(index)))
            .send()
            .await?;
        Self::check(resp).await?;
        tracing::info!(index, "Index created");
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchError> {
        let resp = self
            .authorize(self.http.delete(&self.url(index)))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            tracing::warn!(index, "Index does not exist, nothing to delete");
            return Ok(());
        }
        Self::check(resp).await?;
        tracing::info!(index, "Index deleted");
        Ok(())
    }
}
