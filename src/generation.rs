//! Generation provider trait for grounded answer synthesis.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates text from a prompt.
///
/// Returns `Ok(None)` when the backend responded but produced no usable text;
/// the caller substitutes a sentinel answer rather than propagating an empty
/// string. Transport and API failures are errors.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text for the given prompt.
    ///
    /// # Errors
    ///
    /// [`DocQaError::Generation`](crate::DocQaError::Generation) if the call
    /// to the backend fails.
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}
