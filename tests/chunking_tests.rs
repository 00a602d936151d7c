//! Property tests for whitespace normalization and fixed-size chunking.

use docqa::{Chunker, FixedSizeChunker, normalize_whitespace};
use proptest::prelude::*;

proptest! {
    /// Concatenating the chunks in order reproduces the input exactly:
    /// the windows partition the text with no gaps or overlaps.
    #[test]
    fn chunks_concatenate_back_to_the_input(text in ".*", size in 1usize..50) {
        let chunker = FixedSizeChunker::new(size);
        let rebuilt: String = chunker.chunk(&text).iter().map(|c| c.text.as_str()).collect();
        prop_assert_eq!(rebuilt, text);
    }

    /// Every chunk except possibly the last has exactly `size` characters;
    /// the last has between 1 and `size` when the input is non-empty.
    #[test]
    fn window_lengths_are_exact_except_the_last(text in ".*", size in 1usize..50) {
        let chunker = FixedSizeChunker::new(size);
        let chunks = chunker.chunk(&text);

        if text.is_empty() {
            prop_assert!(chunks.is_empty());
        } else {
            for chunk in &chunks[..chunks.len() - 1] {
                prop_assert_eq!(chunk.text.chars().count(), size);
            }
            let last = chunks.last().unwrap().text.chars().count();
            prop_assert!((1..=size).contains(&last));
        }
    }

    /// Chunk indices count up from zero in document order.
    #[test]
    fn chunk_indices_are_sequential(text in ".+", size in 1usize..50) {
        let chunker = FixedSizeChunker::new(size);
        for (expected, chunk) in chunker.chunk(&text).iter().enumerate() {
            prop_assert_eq!(chunk.index, expected);
        }
    }

    /// Normalization trims the ends, leaves no whitespace runs, and is
    /// idempotent.
    #[test]
    fn normalization_collapses_and_is_idempotent(text in ".*") {
        let normalized = normalize_whitespace(&text);

        prop_assert_eq!(normalized.trim(), normalized.as_str());
        prop_assert!(!normalized.contains("  "));
        for word in normalized.split(' ') {
            prop_assert!(!word.chars().any(char::is_whitespace));
        }
        prop_assert_eq!(normalize_whitespace(&normalized), normalized.clone());
    }
}
