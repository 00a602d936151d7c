//! Error types for the `docqa` crate.

use thiserror::Error;

/// Errors that can occur while ingesting documents or answering questions.
#[derive(Debug, Error)]
pub enum DocQaError {
    /// Text extraction from the raw document bytes failed.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The document yielded no chunks to index.
    #[error("no indexable content extracted from document")]
    NoContentExtracted,

    /// The embedding capability responded, but no numeric vector could be
    /// extracted from any supported response shape.
    #[error("Embedding response ({provider}) had no usable vector: {message}")]
    EmbeddingExtraction {
        /// The embedding provider whose response was rejected.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The call to the embedding capability itself failed (network, quota,
    /// auth). Distinct from [`EmbeddingExtraction`](Self::EmbeddingExtraction).
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingProvider {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Every chunk of the document failed embedding; nothing was stored.
    #[error("all {attempted} chunks failed embedding, nothing stored")]
    NoEmbeddingsProduced {
        /// How many chunks were attempted.
        attempted: usize,
    },

    /// A write to the vector store failed.
    #[error("Vector store write error ({backend}): {message}")]
    StoreWrite {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A similarity search against the vector store failed.
    #[error("Vector store search error ({backend}): {message}")]
    StoreSearch {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The question was empty or whitespace-only.
    #[error("question must not be empty")]
    InvalidQuestion,

    /// Embedding the question failed. Always fatal to the query — unlike an
    /// ingestion-time embedding failure there is nothing to skip.
    #[error("Query embedding error: {message}")]
    QueryEmbedding {
        /// A description of the failure.
        message: String,
    },

    /// The call to the generation capability failed.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for docqa operations.
pub type Result<T> = std::result::Result<T, DocQaError>;
