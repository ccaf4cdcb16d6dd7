//! Sliding-window splitting of tokenized text

use crate::error::{LexrankError, Result};

/// Split a word sequence into overlapping fixed-size windows.
///
/// Windows are taken at stride `window_size - overlap` starting at index 0;
/// the final window may be shorter than `window_size`. For non-degenerate
/// input this yields `ceil(len / step)` windows.
///
/// Errors with [`LexrankError::InvalidWindow`] when `window_size` is zero or
/// `overlap >= window_size`.
pub fn sliding_window(
    words: &[String],
    window_size: usize,
    overlap: usize,
) -> Result<Vec<Vec<String>>> {
    if window_size == 0 || overlap >= window_size {
        return Err(LexrankError::InvalidWindow {
            window_size,
            overlap,
        });
    }

    let step = window_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + window_size).min(words.len());
        chunks.push(words[start..end].to_vec());
        start += step;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        input.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_window_with_overlap() {
        let chunks = sliding_window(&words("a b c d e"), 3, 1).unwrap();
        assert_eq!(
            chunks,
            vec![words("a b c"), words("c d e")]
        );
    }

    #[test]
    fn test_chunk_count_formula() {
        // ceil(N / (window_size - overlap)) chunks, each within window_size
        let input = words("w1 w2 w3 w4 w5 w6 w7 w8 w9 w10 w11");
        for (window_size, overlap) in [(5, 2), (4, 1), (3, 0), (10, 3)] {
            let step = window_size - overlap;
            let chunks = sliding_window(&input, window_size, overlap).unwrap();
            assert_eq!(chunks.len(), input.len().div_ceil(step));
            assert!(chunks.iter().all(|c| c.len() <= window_size));
        }
    }

    #[test]
    fn test_windows_cover_all_words() {
        let input = words("a b c d e f g h");
        let chunks = sliding_window(&input, 3, 1).unwrap();

        let mut covered: Vec<&String> = chunks.iter().flatten().collect();
        covered.dedup();
        for word in &input {
            assert!(covered.contains(&word));
        }
        // Stride positions reproduce the original sequence
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk[0], input[i * 2]);
        }
    }

    #[test]
    fn test_empty_input() {
        let chunks = sliding_window(&[], 3, 1).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_overlap_equal_to_window_rejected() {
        let result = sliding_window(&words("a b c"), 3, 3);
        assert!(matches!(
            result,
            Err(LexrankError::InvalidWindow {
                window_size: 3,
                overlap: 3
            })
        ));
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(sliding_window(&words("a b"), 0, 0).is_err());
    }
}
