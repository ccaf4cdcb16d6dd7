//! Structured query construction

use crate::config::FieldsConfig;
use serde_json::{json, Map, Value};

/// Build the boolean query sent to the search backend.
///
/// Combines a full-text match on the lemmatized text field with an exact
/// phrase match on the tenant alias field. Free-text search semantics: the
/// query text is passed through without additional escaping.
pub fn build_query(query_text: &str, alias: &str, fields: &FieldsConfig) -> Value {
    let mut text_match = Map::new();
    text_match.insert(
        fields.second_field.clone(),
        Value::String(query_text.to_string()),
    );

    let mut alias_phrase = Map::new();
    alias_phrase.insert(fields.first_field.clone(), Value::String(alias.to_string()));

    json!({
        "bool": {
            "must": [
                { "match": Value::Object(text_match) },
                { "match_phrase": Value::Object(alias_phrase) },
            ]
        }
    })
}
