//! Request and response bodies of the HTTP API. All fields are camelCase on the wire.

use chrono::{DateTime, Utc};
use debate_rag::{RetrievalConfig, SearchDocument};
use debate_synth::{ConversationTurn, CounterArgument, Strategy, SynthesisMode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── counter-arguments ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterArgumentsRequest {
    pub topic: Option<String>,
    pub user_stance: Option<String>,
    /// Defaults to `true`.
    #[serde(rename = "includeRAG", alias = "includeRag")]
    pub include_rag: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterArgumentsResponse {
    pub success: bool,
    pub counter_arguments: Vec<CounterArgument>,
    pub metadata: CounterArgumentsMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterArgumentsMetadata {
    pub request_id: Uuid,
    pub topic: String,
    pub stance_length: usize,
    pub generated_at: DateTime<Utc>,
    pub rag_enabled: bool,
    pub synthesis: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval: Option<RetrievalSummary>,
    /// Language model failure that forced a fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalSummary {
    pub search_results_count: usize,
    pub chunks_processed: usize,
    pub relevant_chunks_used: usize,
    pub average_relevance_score: f32,
}

// ── llm-debate ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmDebateRequest {
    pub topic: Option<String>,
    pub stance: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmDebateResponse {
    /// `false` when the reply is the fallback apology.
    pub success: bool,
    pub topic: String,
    pub user_stance: String,
    pub llm_response: String,
    pub conversational: bool,
    pub rag_context: RagContext,
    pub metadata: LlmDebateMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RagContext {
    pub search_results: Vec<SearchDocument>,
    /// Term-overlap scores of the chunks given to the model, rank order.
    pub vector_similarity: Vec<f32>,
    pub total_sources: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmDebateMetadata {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub response_type: ResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Conversational,
    Fallback,
}

// ── status ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub language_model_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RagStatusResponse {
    pub rag_system_active: bool,
    pub features: &'static [&'static str],
    pub synthesis_mode: SynthesisMode,
    pub language_model: LanguageModelStatus,
    pub retrieval: RetrievalStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageModelStatus {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalStatus {
    #[serde(flatten)]
    pub config: RetrievalConfig,
    pub scoring: &'static str,
}

// ── legacy ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LegacyListResponse {
    pub success: bool,
    pub data: Vec<serde_json::Value>,
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegacyMessage {
    pub success: bool,
    pub message: &'static str,
}
