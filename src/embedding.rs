//! Embedding provider trait and response-shape normalization.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{DocQaError, Result};

/// A provider that turns text into a fixed-length embedding vector.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. They perform no retries — retry policy belongs to the caller.
///
/// # Example
///
/// ```rust,ignore
/// use docqa::Embedder;
///
/// let vector = embedder.embed("hello world").await?;
/// assert_eq!(vector.len(), embedder.dimensions());
/// ```
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding vector for a single text input.
    ///
    /// # Errors
    ///
    /// [`DocQaError::EmbeddingProvider`] if the call to the backend fails,
    /// [`DocQaError::EmbeddingExtraction`] if the backend responded but no
    /// vector could be extracted from the response.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the dimensionality of embeddings produced by this provider.
    ///
    /// All vectors stored in and queried against one collection must come
    /// from the same embedding space.
    fn dimensions(&self) -> usize;
}

/// Extract an embedding vector from a raw provider response.
///
/// Embedding APIs nest the vector differently across providers and API
/// versions. This tries a fixed, ordered list of accessor strategies and
/// returns the first that yields a fully numeric array:
///
/// 1. `embedding.values` — a named numeric-array field
/// 2. `embedding` — the field itself is already an array
/// 3. `data[0].embedding` — an alternate response schema
///
/// A candidate that exists but is not entirely numeric is rejected and the
/// next strategy is tried; a partially-valid value is never returned.
///
/// # Errors
///
/// [`DocQaError::EmbeddingExtraction`] if no strategy yields a numeric array.
pub fn extract_embedding_values(response: &Value, provider: &str) -> Result<Vec<f32>> {
    let candidates = [
        response.pointer("/embedding/values"),
        response.get("embedding"),
        response.pointer("/data/0/embedding"),
    ];

    for candidate in candidates.into_iter().flatten() {
        if let Some(values) = as_numeric_array(candidate) {
            return Ok(values);
        }
    }

    Err(DocQaError::EmbeddingExtraction {
        provider: provider.to_string(),
        message: "no numeric vector found under any supported response shape".to_string(),
    })
}

/// Interpret a JSON value as an array of numbers, rejecting mixed content.
fn as_numeric_array(value: &Value) -> Option<Vec<f32>> {
    let items = value.as_array()?;
    items.iter().map(|v| v.as_f64().map(|f| f as f32)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_named_values_field() {
        let response = json!({"embedding": {"values": [0.1, 0.2, 0.3]}});
        let vector = extract_embedding_values(&response, "test").unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn extracts_direct_array_field() {
        let response = json!({"embedding": [1.0, 2.0]});
        let vector = extract_embedding_values(&response, "test").unwrap();
        assert_eq!(vector, vec![1.0, 2.0]);
    }

    #[test]
    fn extracts_nested_data_schema() {
        let response = json!({"data": [{"embedding": [0.5, -0.5]}]});
        let vector = extract_embedding_values(&response, "test").unwrap();
        assert_eq!(vector, vec![0.5, -0.5]);
    }

    #[test]
    fn strategies_are_tried_in_priority_order() {
        // Both shapes present: the named values field wins.
        let response = json!({
            "embedding": {"values": [1.0]},
            "data": [{"embedding": [2.0]}],
        });
        let vector = extract_embedding_values(&response, "test").unwrap();
        assert_eq!(vector, vec![1.0]);
    }

    #[test]
    fn partially_numeric_candidate_is_rejected_not_truncated() {
        // embedding.values is corrupt; the later valid shape is used instead.
        let response = json!({
            "embedding": {"values": [1.0, "oops", 3.0]},
            "data": [{"embedding": [9.0]}],
        });
        let vector = extract_embedding_values(&response, "test").unwrap();
        assert_eq!(vector, vec![9.0]);
    }

    #[test]
    fn unsupported_shape_fails_with_extraction_error() {
        let response = json!({"vectors": [1.0, 2.0]});
        let err = extract_embedding_values(&response, "test").unwrap_err();
        assert!(matches!(err, DocQaError::EmbeddingExtraction { .. }));
    }

    #[test]
    fn non_array_embedding_field_fails() {
        let response = json!({"embedding": "not an array"});
        let err = extract_embedding_values(&response, "test").unwrap_err();
        assert!(matches!(err, DocQaError::EmbeddingExtraction { .. }));
    }
}
