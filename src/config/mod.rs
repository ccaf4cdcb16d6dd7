//! Configuration management for lexrank
//!
//! Every pipeline parameter is an explicit field here: numeric limits,
//! index field names and the alias-to-site mapping are loaded once from
//! TOML at process start and stay immutable for the process lifetime.

use crate::error::{LexrankError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    pub fields: FieldsConfig,
    pub limits: LimitsConfig,
    pub reranker: RerankerConfig,
    pub sites: SitesConfig,
}

/// Search backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the search backend, e.g. "http://localhost:9200"
    pub endpoint: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Per-request timeout, seconds
    pub request_timeout_secs: u64,
    /// Index name or pattern to query, e.g. "ch_documents*"
    pub index: String,
    /// Documents per bulk indexing request
    pub bulk_chunk_size: usize,
}

/// Names of the index fields the pipeline reads and filters on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsConfig {
    /// Tenant/alias field, matched as an exact phrase
    pub first_field: String,
    /// Lemmatized document text field, full-text matched
    pub second_field: String,
    /// Lemmatized title field
    pub third_field: String,
    /// Name of the module id field in hit sources
    pub mod_id_name: String,
    /// Name of the document id field in hit sources
    pub doc_id_name: String,
}

/// Numeric limits governing the retrieval/rerank pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum hits requested from the search backend
    pub max_hits: usize,
    /// Token count above which a hit's text is split into windows
    pub max_sentences: usize,
    /// Sliding window size, in tokens
    pub sentences_chunk_size: usize,
    /// Overlap between consecutive windows, in tokens
    pub sentences_overlap: usize,
    /// Hard ceiling on (query, passage) pairs per cross-encoder call
    pub dense_max_pairs: usize,
    /// Scored chunks kept globally before aggregation
    pub candidates_quantity_total: usize,
    /// Minimum cross-encoder score; chunks below are dropped
    pub rank_score: f32,
    /// Jaccard similarity at or above which a same-document chunk is a duplicate
    pub dedup_jaccard: f32,
    /// Deadline for one full reranker invocation, seconds
    pub rerank_timeout_secs: u64,
    /// Ranked results returned to the caller
    pub results_quantity: usize,
}

/// Cross-encoder model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankerConfig {
    pub model: String,
}

/// Tenant alias to public site mapping, used for deep links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    #[serde(default)]
    pub alias_to_site: HashMap<String, String>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LexrankError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| LexrankError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        // Validate configuration
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| LexrankError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: LEXRANK_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("LEXRANK_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "SEARCH__ENDPOINT" => {
                self.search.endpoint = value.to_string();
            }
            "SEARCH__USERNAME" => {
                self.search.username = value.to_string();
            }
            "SEARCH__PASSWORD" => {
                self.search.password = value.to_string();
            }
            "SEARCH__INDEX" => {
                self.search.index = value.to_string();
            }
            "RERANKER__MODEL" => {
                self.reranker.model = value.to_string();
            }
            "LIMITS__MAX_HITS" => {
                self.limits.max_hits =
                    value.parse().map_err(|_| LexrankError::InvalidConfigValue {
                        path: path.to_string(),
                        message: format!("Cannot parse '{}' as integer", value),
                    })?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| LexrankError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("lexrank").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                endpoint: "http://localhost:9200".to_string(),
                username: String::new(),
                password: String::new(),
                request_timeout_secs: 100,
                index: "ch_documents*".to_string(),
                bulk_chunk_size: 300,
            },
            fields: FieldsConfig {
                first_field: "pub_aliases".to_string(),
                second_field: "text_lem".to_string(),
                third_field: "title_lem".to_string(),
                mod_id_name: "mod_id".to_string(),
                doc_id_name: "doc_id".to_string(),
            },
            limits: LimitsConfig {
                max_hits: 100,
                max_sentences: 10,
                sentences_chunk_size: 10,
                sentences_overlap: 3,
                dense_max_pairs: 50,
                candidates_quantity_total: 500,
                rank_score: -10.0,
                dedup_jaccard: 1.0,
                rerank_timeout_secs: 60,
                results_quantity: 10,
            },
            reranker: RerankerConfig {
                model: "BAAI/bge-reranker-base".to_string(),
            },
            sites: SitesConfig {
                alias_to_site: HashMap::from([
                    ("bss.vip".to_string(), "https://vip.1gl.ru".to_string()),
                    ("bss".to_string(), "https://1gl.ru".to_string()),
                    ("uss".to_string(), "https://1jur.ru".to_string()),
                ]),
            },
        }
    }
}
