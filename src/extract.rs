//! Document text extraction boundary.
//!
//! Real deployments plug in a format-aware extractor (PDF, HTML, …) from
//! outside the crate; [`PlainTextExtractor`] covers plain UTF-8 uploads and
//! tests.

use async_trait::async_trait;

use crate::error::{DocQaError, Result};

/// Extracts text from raw document bytes.
///
/// The extracted text may be empty; ingestion decides what that means.
/// Failures surface as [`DocQaError::Extraction`].
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Extract text from the raw bytes of one document.
    async fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// A [`DocumentExtractor`] for documents that already are UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DocQaError::Extraction(format!("document is not valid UTF-8: {e}")))?;
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn extracts_utf8_text() {
        let text = PlainTextExtractor.extract("hello".as_bytes()).await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn rejects_invalid_utf8() {
        let err = PlainTextExtractor.extract(&[0xff, 0xfe, 0x00]).await.unwrap_err();
        assert!(matches!(err, DocQaError::Extraction(_)));
    }
}
