use crate::config::Config;
use crate::error::{LexrankError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_search(config, &mut errors);
        Self::validate_fields(config, &mut errors);
        Self::validate_limits(config, &mut errors);
        Self::validate_reranker(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LexrankError::ConfigValidation { errors })
        }
    }

    fn validate_search(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.search.endpoint.is_empty() {
            errors.push(ValidationError::new(
                "search.endpoint",
                "Search endpoint cannot be empty",
            ));
        }
        if config.search.index.is_empty() {
            errors.push(ValidationError::new(
                "search.index",
                "Index name cannot be empty",
            ));
        }
        if config.search.bulk_chunk_size == 0 {
            errors.push(ValidationError::new(
                "search.bulk_chunk_size",
                "Bulk chunk size must be positive",
            ));
        }
    }

    fn validate_fields(config: &Config, errors: &mut Vec<ValidationError>) {
        let fields = [
            ("fields.first_field", &config.fields.first_field),
            ("fields.second_field", &config.fields.second_field),
            ("fields.third_field", &config.fields.third_field),
            ("fields.mod_id_name", &config.fields.mod_id_name),
            ("fields.doc_id_name", &config.fields.doc_id_name),
        ];
        for (path, value) in fields {
            if value.is_empty() {
                errors.push(ValidationError::new(path, "Field name cannot be empty"));
            }
        }
    }

    fn validate_limits(config: &Config, errors: &mut Vec<ValidationError>) {
        let limits = &config.limits;

        if limits.max_hits == 0 {
            errors.push(ValidationError::new(
                "limits.max_hits",
                "Maximum hit count must be positive",
            ));
        }
        if limits.sentences_chunk_size == 0 {
            errors.push(ValidationError::new(
                "limits.sentences_chunk_size",
                "Window size must be positive",
            ));
        }
        if limits.sentences_overlap >= limits.sentences_chunk_size {
            errors.push(ValidationError::new(
                "limits.sentences_overlap",
                format!(
                    "Overlap ({}) must be smaller than window size ({})",
                    limits.sentences_overlap, limits.sentences_chunk_size
                ),
            ));
        }
        if limits.dense_max_pairs == 0 {
            errors.push(ValidationError::new(
                "limits.dense_max_pairs",
                "Pair ceiling must be positive",
            ));
        }
        if limits.candidates_quantity_total == 0 {
            errors.push(ValidationError::new(
                "limits.candidates_quantity_total",
                "Candidate quantity must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&limits.dedup_jaccard) {
            errors.push(ValidationError::new(
                "limits.dedup_jaccard",
                format!("Jaccard threshold must be in [0, 1], got {}", limits.dedup_jaccard),
            ));
        }
        if limits.rerank_timeout_secs == 0 {
            errors.push(ValidationError::new(
                "limits.rerank_timeout_secs",
                "Rerank timeout must be positive",
            ));
        }
        if limits.results_quantity == 0 {
            errors.push(ValidationError::new(
                "limits.results_quantity",
                "Result quantity must be positive",
            ));
        }
    }

    fn validate_reranker(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.reranker.model.is_empty() {
            errors.push(ValidationError::new(
                "reranker.model",
                "Reranker model name cannot be empty",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_must_be_smaller_than_window() {
        let mut config = Config::default();
        config.limits.sentences_overlap = config.limits.sentences_chunk_size;

        let result = ConfigValidator::validate(&config);
        assert!(matches!(
            result,
            Err(LexrankError::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let mut config = Config::default();
        config.search.endpoint = String::new();

        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = Config::default();
        config.limits.max_hits = 0;
        config.limits.dense_max_pairs = 0;

        match ConfigValidator::validate(&config) {
            Err(LexrankError::ConfigValidation { errors }) => {
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
