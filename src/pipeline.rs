//! Document QA pipeline orchestrator.
//!
//! [`DocQaPipeline`] coordinates the two workflows of the crate: ingestion
//! (extract → normalize → chunk → embed → store) and answering (embed query →
//! search → assemble context → grounded generation). The four capability
//! handles are injected once at construction and shared read-only afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa::{DocQaConfig, DocQaPipeline, InMemoryVectorStore};
//!
//! let pipeline = DocQaPipeline::builder()
//!     .config(DocQaConfig::default())
//!     .embedder(Arc::new(my_embedder))
//!     .store(Arc::new(InMemoryVectorStore::new()))
//!     .generator(Arc::new(my_generator))
//!     .build()?;
//!
//! pipeline.ensure_collection().await;
//! let report = pipeline.ingest(&document_bytes).await?;
//! let answer = pipeline.answer("What does the document say?").await?;
//! ```

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::chunking::{Chunker, FixedSizeChunker, normalize_whitespace};
use crate::config::DocQaConfig;
use crate::document::{Chunk, IndexRecord, IngestionReport};
use crate::embedding::Embedder;
use crate::error::{DocQaError, Result};
use crate::extract::{DocumentExtractor, PlainTextExtractor};
use crate::generation::Generator;
use crate::vectorstore::{ProvisionOutcome, VectorStore};

/// Answer returned when search finds no matching chunks.
///
/// Generation is never invoked in that case — it must not run ungrounded.
pub const NO_MATCH_ANSWER: &str = "No relevant information found.";

/// Answer returned when generation produces no usable text.
pub const NO_ANSWER_GENERATED: &str = "No answer generated.";

/// The document QA pipeline orchestrator.
///
/// Construct one via [`DocQaPipeline::builder()`]. The pipeline holds no
/// mutable state; a single instance is safe to share across concurrent
/// requests.
pub struct DocQaPipeline {
    config: DocQaConfig,
    extractor: Arc<dyn DocumentExtractor>,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn Generator>,
}

impl std::fmt::Debug for DocQaPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocQaPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DocQaPipeline {
    /// Create a new [`DocQaPipelineBuilder`].
    pub fn builder() -> DocQaPipelineBuilder {
        DocQaPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &DocQaConfig {
        &self.config
    }

    /// Provision the configured collection in the vector store.
    ///
    /// Idempotent: an existing collection reports
    /// [`ProvisionOutcome::AlreadyExists`]. A provisioning failure is logged
    /// and returned as [`ProvisionOutcome::Failed`], never as an error —
    /// ingestion may still be attempted and will fail on its own if the
    /// collection truly is absent.
    pub async fn ensure_collection(&self) -> ProvisionOutcome {
        let name = &self.config.collection;
        let dimensions = self.embedder.dimensions();
        let outcome = self.store.ensure_collection(name, dimensions).await;
        match &outcome {
            ProvisionOutcome::Created => {
                info!(collection = %name, dimensions, "created collection");
            }
            ProvisionOutcome::AlreadyExists => {
                debug!(collection = %name, "collection already exists");
            }
            ProvisionOutcome::Failed { reason } => {
                warn!(
                    collection = %name,
                    %reason,
                    "collection provisioning failed, ingestion may fail later"
                );
            }
        }
        outcome
    }

    /// Delete the configured collection and everything in it.
    ///
    /// Re-provisioning afterwards is the only way to change the collection's
    /// dimensionality.
    pub async fn delete_collection(&self) -> Result<()> {
        self.store.delete_collection(&self.config.collection).await?;
        info!(collection = %self.config.collection, "deleted collection");
        Ok(())
    }

    /// Ingest one document: extract text, normalize, chunk, embed, store.
    ///
    /// Chunks are embedded with bounded concurrency
    /// ([`DocQaConfig::embed_concurrency`] permits). A chunk whose embedding
    /// fails is skipped with a warning; the rest of the document still goes
    /// in. All successfully embedded records are upserted in a single durable
    /// batch before this returns.
    ///
    /// # Errors
    ///
    /// - [`DocQaError::Extraction`] if text extraction fails.
    /// - [`DocQaError::NoContentExtracted`] if the document yields no chunks.
    /// - [`DocQaError::NoEmbeddingsProduced`] if every chunk failed embedding.
    /// - [`DocQaError::StoreWrite`] if the batch upsert fails.
    pub async fn ingest(&self, bytes: &[u8]) -> Result<IngestionReport> {
        let raw = self.extractor.extract(bytes).await?;
        let normalized = normalize_whitespace(&raw);
        let chunks = self.chunker.chunk(&normalized);
        if chunks.is_empty() {
            error!("document produced no indexable chunks");
            return Err(DocQaError::NoContentExtracted);
        }

        let attempted = chunks.len();
        let (records, skipped) = self.embed_chunks(chunks).await;

        if records.is_empty() {
            error!(attempted, "every chunk failed embedding");
            return Err(DocQaError::NoEmbeddingsProduced { attempted });
        }

        self.store.upsert(&self.config.collection, &records, true).await.map_err(|e| {
            error!(collection = %self.config.collection, error = %e, "upsert failed during ingestion");
            e
        })?;

        let report = IngestionReport { stored_count: records.len(), skipped_chunks: skipped };
        info!(
            collection = %self.config.collection,
            stored = report.stored_count,
            skipped = report.skipped_chunks,
            "ingested document"
        );
        Ok(report)
    }

    /// Embed chunks under a concurrency limit, collecting per-chunk outcomes.
    ///
    /// Completion order is irrelevant; each record carries its own payload
    /// text and a fresh id.
    async fn embed_chunks(&self, chunks: Vec<Chunk>) -> (Vec<IndexRecord>, usize) {
        let semaphore = Arc::new(Semaphore::new(self.config.embed_concurrency));
        let mut tasks: JoinSet<(Chunk, Result<Vec<f32>>)> = JoinSet::new();

        for chunk in chunks {
            let embedder = Arc::clone(&self.embedder);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => embedder.embed(&chunk.text).await,
                    // Acquire only fails once the semaphore is closed.
                    Err(_) => Err(DocQaError::EmbeddingProvider {
                        provider: "pipeline".to_string(),
                        message: "embedding task group closed".to_string(),
                    }),
                };
                (chunk, result)
            });
        }

        let mut records = Vec::new();
        let mut skipped = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((chunk, Ok(vector))) => {
                    records.push(IndexRecord {
                        id: Uuid::new_v4().to_string(),
                        vector,
                        text: chunk.text,
                    });
                }
                Ok((chunk, Err(e))) => {
                    warn!(chunk.index = chunk.index, error = %e, "embedding failed, skipping chunk");
                    skipped += 1;
                }
                Err(e) => {
                    warn!(error = %e, "embedding task aborted, skipping chunk");
                    skipped += 1;
                }
            }
        }
        (records, skipped)
    }

    /// Answer a question from the ingested document's content.
    ///
    /// Always resolves to a string for the no-match and no-generation cases:
    /// [`NO_MATCH_ANSWER`] when search returns nothing (generation is not
    /// invoked), [`NO_ANSWER_GENERATED`] when generation returns no usable
    /// text.
    ///
    /// # Errors
    ///
    /// - [`DocQaError::InvalidQuestion`] for an empty or whitespace question.
    /// - [`DocQaError::QueryEmbedding`] if embedding the question fails.
    /// - [`DocQaError::StoreSearch`] if the search fails.
    /// - [`DocQaError::Generation`] if the generation call fails.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DocQaError::InvalidQuestion);
        }

        let query_vector = self.embedder.embed(question).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            DocQaError::QueryEmbedding { message: e.to_string() }
        })?;

        let matches = self
            .store
            .search(&self.config.collection, &query_vector, self.config.top_k)
            .await
            .map_err(|e| {
                error!(collection = %self.config.collection, error = %e, "search failed");
                e
            })?;

        if matches.is_empty() {
            info!(collection = %self.config.collection, "no relevant chunks for question");
            return Ok(NO_MATCH_ANSWER.to_string());
        }

        let context: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
        let prompt = grounded_prompt(&context.join("\n\n"), question);

        match self.generator.generate(&prompt).await? {
            Some(answer) => {
                info!(matched = matches.len(), "answered question from document context");
                Ok(answer)
            }
            None => {
                warn!("generation returned no usable text");
                Ok(NO_ANSWER_GENERATED.to_string())
            }
        }
    }
}

/// Build the generation prompt: the retrieved context (highest similarity
/// first) followed by the question, with an instruction to use only the
/// supplied context.
fn grounded_prompt(context: &str, question: &str) -> String {
    format!(
        "Use ONLY the following document context to answer.\n\n\
         Context:\n{context}\n\n\
         Question:\n{question}"
    )
}

/// Builder for constructing a [`DocQaPipeline`].
///
/// `embedder`, `store`, and `generator` are required. `config` defaults to
/// [`DocQaConfig::default()`], `extractor` to
/// [`PlainTextExtractor`], and `chunker` to a [`FixedSizeChunker`] sized from
/// the config.
#[derive(Default)]
pub struct DocQaPipelineBuilder {
    config: Option<DocQaConfig>,
    extractor: Option<Arc<dyn DocumentExtractor>>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn Embedder>>,
    store: Option<Arc<dyn VectorStore>>,
    generator: Option<Arc<dyn Generator>>,
}

impl DocQaPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: DocQaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document text extractor.
    pub fn extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the chunking strategy.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store backend.
    pub fn store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the generation provider.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the [`DocQaPipeline`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`DocQaError::Config`] if `embedder`, `store`, or `generator`
    /// is missing.
    pub fn build(self) -> Result<DocQaPipeline> {
        let config = self.config.unwrap_or_default();
        let embedder = self
            .embedder
            .ok_or_else(|| DocQaError::Config("embedder is required".to_string()))?;
        let store = self.store.ok_or_else(|| DocQaError::Config("store is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| DocQaError::Config("generator is required".to_string()))?;
        let extractor = self.extractor.unwrap_or_else(|| Arc::new(PlainTextExtractor));
        let chunker =
            self.chunker.unwrap_or_else(|| Arc::new(FixedSizeChunker::new(config.chunk_size)));

        Ok(DocQaPipeline { config, extractor, chunker, embedder, store, generator })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_context_then_question() {
        let prompt = grounded_prompt("first chunk\n\nsecond chunk", "What is this?");
        assert!(prompt.starts_with("Use ONLY"));
        let context_at = prompt.find("first chunk").unwrap();
        let question_at = prompt.find("What is this?").unwrap();
        assert!(context_at < question_at);
    }

    #[test]
    fn builder_requires_capability_handles() {
        let err = DocQaPipeline::builder().build().unwrap_err();
        assert!(matches!(err, DocQaError::Config(_)));
    }
}
