//! Token-set similarity metrics
//!
//! Cheap overlap signals used for near-duplicate suppression ahead of the
//! cross-encoder; never the primary relevance score. Both metrics work on
//! whitespace-tokenized word sets, so repeated words count once.

use std::collections::HashSet;

fn token_set(text: &str) -> HashSet<&str> {
    text.split_whitespace().collect()
}

/// Fraction of `a`'s tokens that also occur in `b`.
///
/// Asymmetric: measures how much of `a` is covered by `b`. Returns 0.0 when
/// `a` has no tokens.
pub fn containment(a: &str, b: &str) -> f32 {
    let tokens_a = token_set(a);
    if tokens_a.is_empty() {
        return 0.0;
    }
    let tokens_b = token_set(b);
    let intersection = tokens_a.intersection(&tokens_b).count();
    intersection as f32 / tokens_a.len() as f32
}

/// Jaccard similarity of the two token sets.
///
/// Returns 0.0 when the union is empty.
pub fn jaccard(a: &str, b: &str) -> f32 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);
    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();
    intersection as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_bounded() {
        let pairs = [
            ("a b c", "b c d"),
            ("x", "y"),
            ("one two", "one two three four"),
        ];
        for (a, b) in pairs {
            for value in [containment(a, b), jaccard(a, b)] {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_self_similarity() {
        let text = "ответить на требование";
        assert_eq!(containment(text, text), 1.0);
        assert_eq!(jaccard(text, text), 1.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(containment("", "a b"), 0.0);
        assert_eq!(jaccard("", ""), 0.0);
    }

    #[test]
    fn test_jaccard_known_value() {
        // intersection {ответить, требование} = 2, union = 4
        let value = jaccard("как ответить на требование", "ответить требование");
        assert_eq!(value, 0.5);
    }

    #[test]
    fn test_containment_asymmetric() {
        let a = "ответить требование";
        let b = "как ответить на требование срок";
        assert_eq!(containment(a, b), 1.0);
        assert_eq!(containment(b, a), 0.4);
    }

    #[test]
    fn test_duplicate_words_count_once() {
        assert_eq!(jaccard("a a a b", "a b"), 1.0);
    }
}
