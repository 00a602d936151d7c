//! Qdrant vector store backend.
//!
//! Provides [`QdrantVectorStore`] which implements [`VectorStore`] using the
//! [qdrant-client](https://docs.rs/qdrant-client) crate over gRPC. Only
//! available when the `qdrant` feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa::qdrant::QdrantVectorStore;
//!
//! let store = QdrantVectorStore::new("http://localhost:6334")?;
//! store.ensure_collection("docs", 768).await;
//! store.upsert("docs", &records, true).await?;
//! let matches = store.search("docs", &query_vector, 5).await?;
//! ```

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;

use crate::document::{IndexRecord, RetrievedMatch};
use crate::error::{DocQaError, Result};
use crate::vectorstore::{ProvisionOutcome, VectorStore};

const BACKEND: &str = "qdrant";

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Collections are created with cosine distance. The chunk text is stored as
/// the point payload under the `text` key.
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    /// Create a new Qdrant vector store connecting to the given URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::write_err)?;
        Ok(Self { client })
    }

    /// Create a new Qdrant vector store with the default URL
    /// (`http://localhost:6334`).
    pub fn default_url() -> Result<Self> {
        Self::new("http://localhost:6334")
    }

    /// Create a new Qdrant vector store from an existing client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn write_err(e: qdrant_client::QdrantError) -> DocQaError {
        DocQaError::StoreWrite { backend: BACKEND.to_string(), message: e.to_string() }
    }

    fn search_err(e: qdrant_client::QdrantError) -> DocQaError {
        DocQaError::StoreSearch { backend: BACKEND.to_string(), message: e.to_string() }
    }

    /// Extract a string from a Qdrant payload value.
    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> ProvisionOutcome {
        let collections = match self.client.list_collections().await {
            Ok(collections) => collections,
            Err(e) => return ProvisionOutcome::Failed { reason: e.to_string() },
        };
        if collections.collections.iter().any(|c| c.name == name) {
            debug!(collection = name, "qdrant collection already exists, skipping creation");
            return ProvisionOutcome::AlreadyExists;
        }

        let create = self
            .client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await;

        match create {
            Ok(_) => {
                debug!(collection = name, dimensions, "created qdrant collection");
                ProvisionOutcome::Created
            }
            Err(e) => ProvisionOutcome::Failed { reason: e.to_string() },
        }
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.client.delete_collection(name).await.map_err(Self::write_err)?;
        debug!(collection = name, "deleted qdrant collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: &[IndexRecord], durable: bool) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = records
            .iter()
            .map(|record| {
                let mut payload_map = serde_json::Map::new();
                payload_map
                    .insert("text".to_string(), serde_json::Value::String(record.text.clone()));
                let payload =
                    Payload::try_from(serde_json::Value::Object(payload_map)).unwrap_or_default();

                PointStruct::new(record.id.clone(), record.vector.clone(), payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(durable))
            .await
            .map_err(Self::write_err)?;

        debug!(collection, count = records.len(), durable, "upserted records to qdrant");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedMatch>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, vector.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(Self::search_err)?;

        let matches = response
            .result
            .into_iter()
            .map(|scored| {
                let text =
                    scored.payload.get("text").and_then(Self::extract_string).unwrap_or_default();
                RetrievedMatch { text, score: scored.score }
            })
            .collect();

        Ok(matches)
    }
}
