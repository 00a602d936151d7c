//! Gemini embedding and generation providers over the Gemini REST API.
//!
//! This module is only available when the `gemini` feature is enabled.
//! Both adapters use `reqwest` against
//! `https://generativelanguage.googleapis.com` with API-key auth via the
//! `x-goog-api-key` header.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::embedding::{Embedder, extract_embedding_values};
use crate::error::{DocQaError, Result};
use crate::generation::Generator;

/// The default Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default embedding model.
const DEFAULT_EMBED_MODEL: &str = "text-embedding-004";

/// The dimensionality of `text-embedding-004` vectors.
const DEFAULT_EMBED_DIMENSIONS: usize = 768;

/// The default generation model.
const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash";

const PROVIDER: &str = "Gemini";

fn missing_api_key<T>() -> Result<T> {
    Err(DocQaError::Config("GOOGLE_API_KEY environment variable not set".to_string()))
}

// ── Embedding ──────────────────────────────────────────────────────

/// An [`Embedder`] backed by the Gemini `embedContent` endpoint.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-004` (768 dimensions).
/// - `output_dimensionality` – optional truncation of the output vector.
/// - `api_key` – from the constructor or the `GOOGLE_API_KEY` environment
///   variable.
///
/// # Example
///
/// ```rust,ignore
/// use docqa::gemini::GeminiEmbedder;
///
/// let embedder = GeminiEmbedder::new("your-api-key")?;
/// let vector = embedder.embed("hello world").await?;
/// ```
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
    /// If set, passed to the API to truncate the output vector.
    output_dimensionality: Option<u32>,
    base_url: String,
}

impl GeminiEmbedder {
    /// Create a new embedder with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(DocQaError::Config("API key must not be empty".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_EMBED_MODEL.to_string(),
            dimensions: DEFAULT_EMBED_DIMENSIONS,
            output_dimensionality: None,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Create a new embedder using the `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        match std::env::var("GOOGLE_API_KEY") {
            Ok(api_key) => Self::new(api_key),
            Err(_) => missing_api_key(),
        }
    }

    /// Set the embedding model (e.g. `gemini-embedding-001`).
    ///
    /// Callers overriding the model are responsible for also setting the
    /// matching dimensionality via
    /// [`with_dimensions`](GeminiEmbedder::with_dimensions).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the dimensionality reported by [`Embedder::dimensions`].
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Ask the API to truncate output vectors to `dims` values.
    ///
    /// This also updates the value reported by [`Embedder::dimensions`].
    pub fn with_output_dimensionality(mut self, dims: u32) -> Self {
        self.output_dimensionality = Some(dims);
        self.dimensions = dims as usize;
        self
    }

    /// Override the API base URL (useful for tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    content: ContentParts<'a>,
    #[serde(rename = "outputDimensionality", skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<u32>,
}

#[derive(Serialize)]
struct ContentParts<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Decode a Gemini error body into its message, falling back to the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, model = %self.model, text_len = text.len(), "embedding text");

        let url = format!("{}/models/{}:embedContent", self.base_url, self.model);
        let request_body = EmbedRequest {
            content: ContentParts { parts: vec![TextPart { text }] },
            output_dimensionality: self.output_dimensionality,
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "embedding request failed");
                DocQaError::EmbeddingProvider {
                    provider: PROVIDER.to_string(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = PROVIDER, %status, "embedding API error");
            return Err(DocQaError::EmbeddingProvider {
                provider: PROVIDER.to_string(),
                message: format!("API returned {status}: {}", error_detail(&body)),
            });
        }

        // The vector's nesting varies across API versions; normalize it
        // instead of deserializing a single fixed shape.
        let body: Value = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to decode embedding response");
            DocQaError::EmbeddingProvider {
                provider: PROVIDER.to_string(),
                message: format!("failed to decode response: {e}"),
            }
        })?;

        extract_embedding_values(&body, PROVIDER)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Generation ─────────────────────────────────────────────────────

/// A [`Generator`] backed by the Gemini `generateContent` endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use docqa::gemini::GeminiGenerator;
///
/// let generator = GeminiGenerator::new("your-api-key")?;
/// let answer = generator.generate("Answer from this context: ...").await?;
/// ```
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    /// Create a new generator with the given API key and the default model
    /// (`gemini-2.5-flash`).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(DocQaError::Config("API key must not be empty".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_GENERATION_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Create a new generator using the `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        match std::env::var("GOOGLE_API_KEY") {
            Ok(api_key) => Self::new(api_key),
            Err(_) => missing_api_key(),
        }
    }

    /// Set the generation model (e.g. `gemini-2.5-pro`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (useful for tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<ContentParts<'a>>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenate the text parts of the first candidate, if any.
    fn text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let parts = candidate.content?.parts;
        let text: String =
            parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join("");
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        debug!(provider = PROVIDER, model = %self.model, prompt_len = prompt.len(), "generating");

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request_body = GenerateRequest {
            contents: vec![ContentParts { parts: vec![TextPart { text: prompt }] }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "generation request failed");
                DocQaError::Generation {
                    provider: PROVIDER.to_string(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = PROVIDER, %status, "generation API error");
            return Err(DocQaError::Generation {
                provider: PROVIDER.to_string(),
                message: format!("API returned {status}: {}", error_detail(&body)),
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to decode generation response");
            DocQaError::Generation {
                provider: PROVIDER.to_string(),
                message: format!("failed to decode response: {e}"),
            }
        })?;

        Ok(body.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generation_response_concatenates_first_candidate_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "Hello, "}, {"text": "world!"}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Hello, world!"));
    }

    #[test]
    fn empty_or_missing_candidates_yield_no_text() {
        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), None);

        let blank: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "   "}]}}]
        }))
        .unwrap();
        assert_eq!(blank.text(), None);
    }

    #[test]
    fn error_detail_prefers_structured_message() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(error_detail(body), "quota exceeded");
        assert_eq!(error_detail("plain failure"), "plain failure");
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(GeminiEmbedder::new(""), Err(DocQaError::Config(_))));
        assert!(matches!(GeminiGenerator::new(""), Err(DocQaError::Config(_))));
    }
}
