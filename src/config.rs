//! Configuration for the document QA pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{DocQaError, Result};

/// Configuration parameters for a [`DocQaPipeline`](crate::DocQaPipeline).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocQaConfig {
    /// Name of the vector store collection holding the document's chunks.
    pub collection: String,
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of top matches retrieved when answering a question.
    pub top_k: usize,
    /// Maximum number of concurrent embedding calls during ingestion.
    pub embed_concurrency: usize,
}

impl Default for DocQaConfig {
    fn default() -> Self {
        Self { collection: "documents".to_string(), chunk_size: 1000, top_k: 5, embed_concurrency: 4 }
    }
}

impl DocQaConfig {
    /// Create a new builder for constructing a [`DocQaConfig`].
    pub fn builder() -> DocQaConfigBuilder {
        DocQaConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`DocQaConfig`].
#[derive(Debug, Clone, Default)]
pub struct DocQaConfigBuilder {
    config: DocQaConfig,
}

impl DocQaConfigBuilder {
    /// Set the collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the number of top matches retrieved when answering.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the maximum number of concurrent embedding calls during ingestion.
    pub fn embed_concurrency(mut self, limit: usize) -> Self {
        self.config.embed_concurrency = limit;
        self
    }

    /// Build the [`DocQaConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`DocQaError::Config`] if:
    /// - `collection` is empty
    /// - `chunk_size == 0`
    /// - `top_k == 0`
    /// - `embed_concurrency == 0`
    pub fn build(self) -> Result<DocQaConfig> {
        if self.config.collection.is_empty() {
            return Err(DocQaError::Config("collection name must not be empty".to_string()));
        }
        if self.config.chunk_size == 0 {
            return Err(DocQaError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.top_k == 0 {
            return Err(DocQaError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.embed_concurrency == 0 {
            return Err(DocQaError::Config(
                "embed_concurrency must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let config = DocQaConfig::builder().build().unwrap();
        assert_eq!(config, DocQaConfig::default());
    }

    #[test]
    fn zero_parameters_are_rejected() {
        assert!(DocQaConfig::builder().chunk_size(0).build().is_err());
        assert!(DocQaConfig::builder().top_k(0).build().is_err());
        assert!(DocQaConfig::builder().embed_concurrency(0).build().is_err());
        assert!(DocQaConfig::builder().collection("").build().is_err());
    }

    #[test]
    fn builder_overrides_are_applied() {
        let config = DocQaConfig::builder()
            .collection("company_docs")
            .chunk_size(512)
            .top_k(3)
            .embed_concurrency(8)
            .build()
            .unwrap();
        assert_eq!(config.collection, "company_docs");
        assert_eq!(config.chunk_size, 512);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.embed_concurrency, 8);
    }
}
