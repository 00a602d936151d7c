//! Data types for chunks, index records, and search results.

use serde::{Deserialize, Serialize};

/// A contiguous slice of a document's normalized text.
///
/// Chunks partition the text with no gaps or overlaps; `index` records the
/// original document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position of this chunk within the document.
    pub index: usize,
    /// The text content of the chunk.
    pub text: String,
}

/// A vector-plus-payload record as stored in a collection.
///
/// Records are only ever inserted or deleted wholesale, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexRecord {
    /// Unique identifier (a freshly generated UUID at ingestion time).
    pub id: String,
    /// The embedding vector. Must match the collection's dimensionality.
    pub vector: Vec<f32>,
    /// The chunk text stored as payload.
    pub text: String,
}

/// A retrieved payload paired with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedMatch {
    /// The stored chunk text.
    pub text: String,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// Outcome of ingesting one document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestionReport {
    /// Number of chunks successfully embedded and stored.
    pub stored_count: usize,
    /// Number of chunks skipped because embedding failed.
    pub skipped_chunks: usize,
}
