//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] is a zero-dependency backend backed by a `HashMap`
//! behind a `tokio::sync::RwLock`, suitable for development and testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexRecord, RetrievedMatch};
use crate::error::{DocQaError, Result};
use crate::vectorstore::{ProvisionOutcome, VectorStore};

const BACKEND: &str = "InMemory";

/// One named collection: fixed dimensionality plus records keyed by id.
#[derive(Debug)]
struct Collection {
    dimensions: usize,
    records: HashMap<String, IndexRecord>,
}

/// An in-memory [`VectorStore`] using cosine similarity for search.
///
/// Writes are immediately visible, so the `durable` upsert flag is a no-op.
/// Dimensionality is validated on upsert, rejecting mismatched records before
/// anything from the batch is stored.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> ProvisionOutcome {
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return ProvisionOutcome::AlreadyExists;
        }
        collections.insert(name.to_string(), Collection { dimensions, records: HashMap::new() });
        ProvisionOutcome::Created
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        records: &[IndexRecord],
        _durable: bool,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let target = collections.get_mut(collection).ok_or_else(|| DocQaError::StoreWrite {
            backend: BACKEND.to_string(),
            message: format!("collection '{collection}' does not exist"),
        })?;

        for record in records {
            if record.vector.len() != target.dimensions {
                return Err(DocQaError::StoreWrite {
                    backend: BACKEND.to_string(),
                    message: format!(
                        "record '{}' has dimension {} but collection '{collection}' expects {}",
                        record.id,
                        record.vector.len(),
                        target.dimensions
                    ),
                });
            }
        }
        for record in records {
            target.records.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedMatch>> {
        let collections = self.collections.read().await;
        let target = collections.get(collection).ok_or_else(|| DocQaError::StoreSearch {
            backend: BACKEND.to_string(),
            message: format!("collection '{collection}' does not exist"),
        })?;

        let mut matches: Vec<RetrievedMatch> = target
            .records
            .values()
            .map(|record| RetrievedMatch {
                text: record.text.clone(),
                score: cosine_similarity(&record.vector, vector),
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);
        Ok(matches)
    }
}
