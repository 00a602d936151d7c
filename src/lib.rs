//! # docqa
//!
//! Document question answering with retrieval-augmented generation.
//!
//! ## Overview
//!
//! Upload a document, have it split into retrievable chunks and indexed into
//! a vector store, then ask natural-language questions answered only from
//! that document's content. The crate provides two pipelines behind one
//! orchestrator:
//!
//! - **Ingestion** — extract text, normalize whitespace, chunk into
//!   fixed-size windows, embed each chunk (bounded concurrency, per-chunk
//!   failures skipped), upsert everything in one durable batch.
//! - **Answering** — embed the question, retrieve the top-K most similar
//!   chunks, assemble them into a context block, and generate a grounded
//!   answer. Generation never runs without retrieved context.
//!
//! External capabilities are consumed through traits and injected explicitly:
//! [`DocumentExtractor`], [`Embedder`], [`Generator`], and [`VectorStore`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa::gemini::{GeminiEmbedder, GeminiGenerator};
//! use docqa::qdrant::QdrantVectorStore;
//! use docqa::{DocQaConfig, DocQaPipeline};
//!
//! let pipeline = DocQaPipeline::builder()
//!     .config(DocQaConfig::builder().collection("company_docs").build()?)
//!     .embedder(Arc::new(GeminiEmbedder::from_env()?))
//!     .generator(Arc::new(GeminiGenerator::from_env()?))
//!     .store(Arc::new(QdrantVectorStore::default_url()?))
//!     .build()?;
//!
//! pipeline.ensure_collection().await;
//! let report = pipeline.ingest(&uploaded_bytes).await?;
//! println!("stored {} chunks", report.stored_count);
//!
//! let answer = pipeline.answer("What does the document say about X?").await?;
//! ```
//!
//! ## Features
//!
//! - `gemini` — [`GeminiEmbedder`](gemini::GeminiEmbedder) and
//!   [`GeminiGenerator`](gemini::GeminiGenerator) over the Gemini REST API.
//! - `qdrant` — [`QdrantVectorStore`](qdrant::QdrantVectorStore) over gRPC.
//!
//! [`InMemoryVectorStore`] and the [`mock`] providers are always available
//! for development and testing.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod generation;
pub mod inmemory;
pub mod mock;
pub mod pipeline;
#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod vectorstore;

pub use chunking::{Chunker, FixedSizeChunker, normalize_whitespace};
pub use config::{DocQaConfig, DocQaConfigBuilder};
pub use document::{Chunk, IndexRecord, IngestionReport, RetrievedMatch};
pub use embedding::{Embedder, extract_embedding_values};
pub use error::{DocQaError, Result};
pub use extract::{DocumentExtractor, PlainTextExtractor};
pub use generation::Generator;
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{DocQaPipeline, DocQaPipelineBuilder, NO_ANSWER_GENERATED, NO_MATCH_ANSWER};
pub use vectorstore::{ProvisionOutcome, VectorStore};
