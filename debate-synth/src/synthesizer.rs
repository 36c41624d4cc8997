//! Answer synthesis: language model first, templates as the fallback.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use debate_model::{GenerationConfig, Llm, LlmRequest};
use debate_rag::{RankedChunk, RetrievalOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::argument::{ARGUMENT_COUNT, ArgumentOrigin, ArgumentSet, CounterArgument, Strategy, round3};
use crate::heuristic::{
    enrich_with_retrieval, keyword_arguments, pad_arguments, retrieval_fallback_arguments,
};
use crate::prompt::{ConversationTurn, apology, debate_prompt};
use crate::themes::search_terms;

/// Paragraphs of model output at or below this many characters are not arguments.
const MIN_PARAGRAPH_CHARS: usize = 50;

/// Which path produces counter-arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisMode {
    /// Ask the language model, falling back to templates on failure.
    LanguageModel,
    /// Never call the language model for counter-arguments.
    KeywordHeuristic,
}

impl SynthesisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LanguageModel => "language_model",
            Self::KeywordHeuristic => "keyword_heuristic",
        }
    }
}

impl fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SynthesisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" | "language_model" | "language-model" | "gemini" => Ok(Self::LanguageModel),
            "heuristic" | "keyword_heuristic" | "keyword-heuristic" | "keyword" => {
                Ok(Self::KeywordHeuristic)
            }
            other => Err(format!("unknown synthesis mode '{other}'")),
        }
    }
}

/// Text produced by [`Synthesizer::synthesize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// Model output, or the apology when the model failed.
    pub text: String,
    /// The model that answered, when one did.
    pub model: Option<String>,
    /// Why the model could not answer.
    pub error: Option<String>,
}

impl Synthesis {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Produces conversational replies and counter-arguments.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct Synthesizer {
    llm: Option<Arc<dyn Llm>>,
    mode: SynthesisMode,
    generation: GenerationConfig,
}

impl Synthesizer {
    /// A synthesizer with no language model attached.
    pub fn new(mode: SynthesisMode) -> Self {
        Self { llm: None, mode, generation: GenerationConfig::default() }
    }

    /// Attach the language model used by the primary path.
    pub fn with_llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Override the sampling parameters.
    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn mode(&self) -> SynthesisMode {
        self.mode
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Name of the attached model, if any.
    pub fn model_name(&self) -> Option<&str> {
        self.llm.as_deref().map(|llm| llm.name())
    }

    /// Whether counter-arguments will be requested from the language model.
    pub fn uses_language_model(&self) -> bool {
        self.mode == SynthesisMode::LanguageModel && self.llm.is_some()
    }

    /// Generate a conversational reply grounded in `chunks`.
    ///
    /// Never fails: when no model is attached or the call errors, the text is
    /// the fixed apology and `error` carries the reason.
    pub async fn synthesize(
        &self,
        topic: &str,
        stance: &str,
        chunks: &[RankedChunk],
        history: &[ConversationTurn],
    ) -> Synthesis {
        let Some(llm) = &self.llm else {
            warn!("no language model configured, returning apology");
            return Synthesis {
                text: apology(topic, stance),
                model: None,
                error: Some("language model is not configured".to_string()),
            };
        };

        let prompt = debate_prompt(topic, stance, chunks, history);
        debug!(model = llm.name(), prompt_len = prompt.len(), chunks = chunks.len(), "requesting synthesis");

        match llm.generate(LlmRequest::new(prompt).with_config(self.generation)).await {
            Ok(response) => {
                info!(model = %response.model, response_len = response.text.len(), "synthesis completed");
                Synthesis { text: response.text, model: Some(response.model), error: None }
            }
            Err(e) => {
                warn!(model = llm.name(), error = %e, "language model failed, returning apology");
                Synthesis { text: apology(topic, stance), model: None, error: Some(e.to_string()) }
            }
        }
    }

    /// Produce exactly [`ARGUMENT_COUNT`] counter-arguments.
    ///
    /// `retrieval` is `None` when the caller disabled retrieval; the keyword
    /// heuristic is used then regardless of mode.
    pub async fn counter_arguments(
        &self,
        topic: &str,
        stance: &str,
        retrieval: Option<&RetrievalOutcome>,
    ) -> ArgumentSet {
        let Some(outcome) = retrieval else {
            return ArgumentSet {
                arguments: keyword_arguments(topic, stance),
                strategy: Strategy::KeywordHeuristic,
                error: None,
            };
        };

        if !self.uses_language_model() {
            let mut arguments = keyword_arguments(topic, stance);
            enrich_with_retrieval(&mut arguments, outcome, topic);
            return ArgumentSet { arguments, strategy: Strategy::KeywordHeuristic, error: None };
        }

        let chunks = &outcome.relevant_chunks;
        let synthesis = self.synthesize(topic, stance, chunks, &[]).await;

        let (mut arguments, strategy) = if synthesis.succeeded() {
            (paragraph_arguments(&synthesis.text, topic, chunks), Strategy::LanguageModel)
        } else {
            (Vec::new(), Strategy::RetrievalFallback)
        };

        if arguments.len() < ARGUMENT_COUNT {
            let have = arguments.len();
            arguments.extend(retrieval_fallback_arguments(topic, stance, chunks).into_iter().skip(have));
        }
        if arguments.len() < ARGUMENT_COUNT {
            let mut filler = keyword_arguments(topic, stance);
            enrich_with_retrieval(&mut filler, outcome, topic);
            arguments.extend(filler);
        }
        pad_arguments(&mut arguments);

        ArgumentSet { arguments, strategy, error: synthesis.error }
    }
}

/// Split model output into paragraph arguments carrying chunk provenance.
fn paragraph_arguments(text: &str, topic: &str, chunks: &[RankedChunk]) -> Vec<CounterArgument> {
    let mut sources: Vec<String> = Vec::new();
    for ranked in chunks.iter().take(2) {
        if !sources.contains(&ranked.chunk.source) {
            sources.push(ranked.chunk.source.clone());
        }
    }
    let retrieved_at = Utc::now();

    text.split("\n\n")
        .map(str::trim)
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
        .take(ARGUMENT_COUNT)
        .enumerate()
        .map(|(index, paragraph)| {
            let theme = format!("perspective_{}", index + 1);
            let mut argument = CounterArgument::new(
                paragraph,
                sources.clone(),
                theme.clone(),
                0.85,
                ArgumentOrigin::LanguageModel,
            );
            argument.rag_enhanced = Some(true);
            argument.is_rag_synthesis = Some(true);
            argument.web_search_terms = Some(search_terms(topic, &theme));
            if !chunks.is_empty() {
                let ranked = &chunks[index % chunks.len()];
                let score = round3(ranked.similarity_score);
                argument.retrieval_score = Some(score);
                argument.vector_similarity = Some(score);
                argument.confidence = round3(0.85 + 0.1 * ranked.similarity_score);
                argument.source_url = Some(ranked.chunk.url.clone());
                argument.retrieved_at = Some(retrieved_at);
            }
            argument
        })
        .collect()
}
