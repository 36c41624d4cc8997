//! Gemini provider using the `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::llm::{GenerationConfig, Llm, LlmRequest, LlmResponse, UsageMetadata};

/// The public Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default request timeout for a single generation call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "Gemini";

/// An [`Llm`] backed by the Gemini `generateContent` API.
///
/// Uses `reqwest` to call the endpoint directly; the API key travels in the
/// `x-goog-api-key` header.
///
/// # Example
///
/// ```rust,ignore
/// use debate_model::{GeminiModel, Llm, LlmRequest};
///
/// let model = GeminiModel::new(std::env::var("GEMINI_API_KEY")?, "gemini-2.5-flash")?;
/// let response = model.generate(LlmRequest::new("Argue against four-day weeks")).await?;
/// println!("{}", response.text);
/// ```
#[derive(Debug, Clone)]
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    /// Create a client for `model` with the default base URL and timeout.
    ///
    /// A leading `models/` prefix on the model name is accepted and stripped.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ModelError::ConfigError("API key must not be empty".into()));
        }
        let model = model.into();
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();
        if model.is_empty() {
            return Err(ModelError::ConfigError("model name must not be empty".into()));
        }

        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT)?,
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API base (proxies, local stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ModelError::ConfigError(format!("failed to build HTTP client: {e}")))
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Collapse the first candidate into an [`LlmResponse`].
    pub(crate) fn into_llm_response(self, requested_model: &str) -> Result<LlmResponse> {
        let model = self.model_version.unwrap_or_else(|| requested_model.to_string());

        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self.prompt_feedback.and_then(|f| f.block_reason);
            return Err(match reason {
                Some(reason) => ModelError::Blocked(reason),
                None => ModelError::EmptyResponse,
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        let text = text.trim().to_string();

        if text.is_empty() {
            return Err(match candidate.finish_reason.as_deref() {
                Some(reason @ ("SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
                    ModelError::Blocked(reason.to_string())
                }
                _ => ModelError::EmptyResponse,
            });
        }

        Ok(LlmResponse {
            text,
            model,
            finish_reason: candidate.finish_reason,
            usage: self.usage_metadata,
        })
    }
}

// ── Llm implementation ─────────────────────────────────────────────

#[async_trait]
impl Llm for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        debug!(provider = PROVIDER, model = %self.model, prompt_len = request.prompt.len(), "generating");

        let body = GenerateContentRequest {
            contents: [Content { role: "user", parts: [Part { text: &request.prompt }] }],
            generation_config: request.config,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                if e.is_timeout() {
                    ModelError::Timeout { provider: PROVIDER.into() }
                } else {
                    ModelError::RequestError {
                        provider: PROVIDER.into(),
                        message: format!("request failed: {e}"),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(ModelError::ApiError { status: status.as_u16(), message: detail });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            if e.is_timeout() {
                ModelError::Timeout { provider: PROVIDER.into() }
            } else {
                ModelError::DecodeError(format!("failed to parse response: {e}"))
            }
        })?;

        parsed.into_llm_response(&self.model)
    }
}
