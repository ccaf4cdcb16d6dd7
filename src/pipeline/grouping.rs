//! Key-based grouping of scored tuples

/// Group `(key, value)` pairs by key.
///
/// Output is sorted ascending by key; within a group, values keep the order
/// they had after the stable sort, so equal-key input order is preserved.
/// Every input pair lands in exactly one group.
pub fn group_by_key<K, V>(mut pairs: Vec<(K, V)>) -> Vec<(K, Vec<V>)>
where
    K: Ord + Clone,
{
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut grouped: Vec<(K, Vec<V>)> = Vec::new();
    for (key, value) in pairs {
        match grouped.last_mut() {
            Some((last_key, values)) if *last_key == key => values.push(value),
            _ => grouped.push((key, vec![value])),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_sorted_by_key() {
        let pairs = vec![("b", 1), ("a", 2), ("c", 3), ("a", 4)];
        let grouped = group_by_key(pairs);

        assert_eq!(
            grouped,
            vec![("a", vec![2, 4]), ("b", vec![1]), ("c", vec![3])]
        );
    }

    #[test]
    fn test_grouping_is_total_partition() {
        let pairs: Vec<(u32, u32)> = vec![(3, 0), (1, 1), (3, 2), (2, 3), (1, 4), (3, 5)];
        let total = pairs.len();
        let grouped = group_by_key(pairs);

        let regrouped: usize = grouped.iter().map(|(_, values)| values.len()).sum();
        assert_eq!(regrouped, total);

        // every original value appears exactly once, under its own key
        let mut seen: Vec<u32> = grouped.iter().flat_map(|(_, v)| v.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_input() {
        let grouped: Vec<(String, Vec<u32>)> = group_by_key(vec![]);
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_stable_within_group() {
        let pairs = vec![("k", "first"), ("k", "second"), ("k", "third")];
        let grouped = group_by_key(pairs);
        assert_eq!(grouped[0].1, vec!["first", "second", "third"]);
    }
}
