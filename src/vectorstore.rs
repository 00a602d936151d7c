//! Vector store trait for storing and searching embedding records.

use async_trait::async_trait;

use crate::document::{IndexRecord, RetrievedMatch};
use crate::error::Result;

/// Outcome of provisioning a collection.
///
/// Provisioning is idempotent and never throws: an existing collection is
/// [`AlreadyExists`](Self::AlreadyExists), not an error, and a creation
/// failure is [`Failed`](Self::Failed) so the caller can log it and continue
/// (ingestion will fail later if the collection truly is absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The collection was newly created.
    Created,
    /// A collection with this name already exists.
    AlreadyExists,
    /// Creation was attempted and failed.
    Failed {
        /// A description of the failure.
        reason: String,
    },
}

/// A storage backend for embedding vectors with similarity search.
///
/// Implementations manage named collections of [`IndexRecord`]s. A collection
/// has a fixed dimensionality and cosine similarity metric for its lifetime;
/// changing dimensionality requires deleting and recreating it.
///
/// # Example
///
/// ```rust,ignore
/// use docqa::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.ensure_collection("docs", 768).await;
/// store.upsert("docs", &records, true).await?;
/// let matches = store.search("docs", &query_vector, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection with the given dimensionality if it does not
    /// already exist.
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> ProvisionOutcome;

    /// Delete a named collection and all its records.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Insert or replace records by id.
    ///
    /// When `durable` is set, the call does not return until the write is
    /// visible to subsequent searches.
    ///
    /// # Errors
    ///
    /// [`DocQaError::StoreWrite`](crate::DocQaError::StoreWrite) on any record
    /// whose vector dimensionality mismatches the collection, or on a backend
    /// failure.
    async fn upsert(&self, collection: &str, records: &[IndexRecord], durable: bool)
    -> Result<()>;

    /// Return up to `top_k` matches ordered by descending similarity score.
    ///
    /// An empty collection, or one where nothing is close enough to rank,
    /// yields an empty `Vec`, not an error.
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedMatch>>;
}
