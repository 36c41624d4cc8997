//! Counter-argument data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of counter-arguments returned for every request.
pub const ARGUMENT_COUNT: usize = 3;

/// Which synthesis path produced an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentOrigin {
    /// A paragraph of language model output.
    LanguageModel,
    /// A template filled from a retrieved chunk.
    RetrievalFallback,
    /// A canned argument chosen by keyword matching.
    KeywordHeuristic,
}

/// One counter-argument, with optional retrieval provenance.
///
/// `vector_similarity` is a compatibility label: it carries the same
/// term-overlap score as `retrieval_score`, not an embedding distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterArgument {
    pub text: String,
    pub sources: Vec<String>,
    pub theme: String,
    pub confidence: f32,
    pub origin: ArgumentOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag_enhanced: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_similarity: Option<f32>,
    #[serde(rename = "isRAGSynthesis", skip_serializing_if = "Option::is_none")]
    pub is_rag_synthesis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_search_terms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieved_at: Option<DateTime<Utc>>,
}

impl CounterArgument {
    /// An argument with no retrieval provenance attached.
    pub fn new(
        text: impl Into<String>,
        sources: Vec<String>,
        theme: impl Into<String>,
        confidence: f32,
        origin: ArgumentOrigin,
    ) -> Self {
        Self {
            text: text.into(),
            sources,
            theme: theme.into(),
            confidence,
            origin,
            rag_enhanced: None,
            retrieval_score: None,
            vector_similarity: None,
            is_rag_synthesis: None,
            web_search_terms: None,
            source_url: None,
            retrieved_at: None,
        }
    }
}

/// How an [`ArgumentSet`] was produced as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    LanguageModel,
    RetrievalFallback,
    KeywordHeuristic,
}

/// Exactly [`ARGUMENT_COUNT`] counter-arguments plus how they were made.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSet {
    pub arguments: Vec<CounterArgument>,
    pub strategy: Strategy,
    /// Set when the language model failed and a fallback was used.
    pub error: Option<String>,
}

/// Round to three decimal places for presentation.
pub fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}
