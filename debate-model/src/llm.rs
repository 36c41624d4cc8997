//! The [`Llm`] trait and its request/response types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { temperature: 0.9, top_p: 0.8, top_k: 40, max_output_tokens: 2048 }
    }
}

/// A single-prompt generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// The full prompt text.
    pub prompt: String,
    /// Sampling parameters.
    pub config: GenerationConfig,
}

impl LlmRequest {
    /// Create a request with default sampling parameters.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), config: GenerationConfig::default() }
    }

    /// Replace the sampling parameters.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

/// The text produced for an [`LlmRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Generated text, trimmed.
    pub text: String,
    /// The model that answered.
    pub model: String,
    /// Why generation stopped, when the provider reports it.
    pub finish_reason: Option<String>,
    pub usage: Option<UsageMetadata>,
}

/// A text generation backend.
///
/// Implementations must be cheap to share behind an `Arc`; the server calls
/// [`generate`](Llm::generate) concurrently from many requests.
#[async_trait]
pub trait Llm: Send + Sync {
    /// The configured model identifier.
    fn name(&self) -> &str;

    /// Generate a completion for `request`.
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse>;
}
