//! Mock capability providers for tests and examples.
//!
//! [`MockEmbedder`] produces deterministic keyword-occurrence vectors so that
//! cosine similarity reflects keyword overlap, and can inject failures for
//! chosen inputs. [`MockGenerator`] returns a canned reply and records every
//! prompt it receives, letting tests assert that generation did (or did not)
//! run and what context it was grounded in.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::embedding::Embedder;
use crate::error::{DocQaError, Result};
use crate::generation::Generator;

/// A deterministic [`Embedder`] for tests.
///
/// The vector has one component per configured keyword (its occurrence count
/// in the lowercased input) plus a constant bias component, so no input maps
/// to the zero vector. Texts sharing keywords score high cosine similarity;
/// texts sharing none score low but non-zero.
pub struct MockEmbedder {
    keywords: Vec<String>,
    fail_on: Option<String>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    /// Create an embedder scoring occurrences of the given keywords.
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            fail_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail with an [`DocQaError::EmbeddingProvider`] error for any input
    /// containing `marker`. An empty marker fails every input.
    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_on = Some(marker.into());
        self
    }

    /// Number of `embed` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(marker) = &self.fail_on {
            if text.contains(marker.as_str()) {
                return Err(DocQaError::EmbeddingProvider {
                    provider: "Mock".to_string(),
                    message: format!("injected failure for input containing {marker:?}"),
                });
            }
        }

        let lowered = text.to_lowercase();
        let mut vector: Vec<f32> =
            self.keywords.iter().map(|k| lowered.matches(k.as_str()).count() as f32).collect();
        vector.push(1.0);
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.keywords.len() + 1
    }
}

/// A canned-reply [`Generator`] for tests.
pub struct MockGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Create a generator that always replies with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: Some(reply.into()), prompts: Mutex::new(Vec::new()) }
    }

    /// Create a generator that produces no usable text.
    pub fn empty() -> Self {
        Self { reply: None, prompts: Mutex::new(Vec::new()) }
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// The most recent prompt, if any call was made.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok().and_then(|p| p.last().cloned())
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keyword_overlap_drives_similarity() {
        let embedder = MockEmbedder::new(&["relevant", "unrelated"]);
        let a = embedder.embed("A relevant fact.").await.unwrap();
        let b = embedder.embed("What is relevant?").await.unwrap();
        let c = embedder.embed("An unrelated fact.").await.unwrap();
        assert_eq!(a, vec![1.0, 0.0, 1.0]);
        assert_eq!(a, b);
        assert_eq!(c, vec![0.0, 1.0, 1.0]);
        assert_eq!(embedder.call_count(), 3);
    }

    #[tokio::test]
    async fn injected_failure_only_hits_marked_inputs() {
        let embedder = MockEmbedder::new(&["x"]).failing_on("bad");
        assert!(embedder.embed("good input").await.is_ok());
        assert!(matches!(
            embedder.embed("a bad input").await,
            Err(DocQaError::EmbeddingProvider { .. })
        ));
    }

    #[tokio::test]
    async fn generator_records_prompts() {
        let generator = MockGenerator::new("the answer");
        let reply = generator.generate("some prompt").await.unwrap();
        assert_eq!(reply.as_deref(), Some("the answer"));
        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.last_prompt().as_deref(), Some("some prompt"));
    }
}
