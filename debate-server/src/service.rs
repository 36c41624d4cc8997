//! Request orchestration: retrieval followed by synthesis.

use std::sync::Arc;

use chrono::Utc;
use debate_rag::{Query, RagError, RetrievalOutcome, RetrievalPipeline};
use debate_synth::{ConversationTurn, Synthesizer, round3};
use tracing::{info, warn};
use uuid::Uuid;

use crate::protocol::{
    CounterArgumentsMetadata, CounterArgumentsResponse, LlmDebateMetadata, LlmDebateResponse,
    RagContext, ResponseType, RetrievalSummary,
};
use crate::validation::DebateInput;

/// Runs the retrieval pipeline and the synthesizer for validated input.
pub struct DebateService {
    pipeline: Arc<RetrievalPipeline>,
    synthesizer: Arc<Synthesizer>,
}

impl DebateService {
    pub fn new(pipeline: RetrievalPipeline, synthesizer: Synthesizer) -> Self {
        Self { pipeline: Arc::new(pipeline), synthesizer: Arc::new(synthesizer) }
    }

    pub fn pipeline(&self) -> &RetrievalPipeline {
        &self.pipeline
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Produce three counter-arguments, retrieving evidence first when `include_rag` is set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError`] only when retrieval itself fails; language model
    /// failures are absorbed into a fallback and reported in the metadata.
    pub async fn counter_arguments(
        &self,
        input: &DebateInput,
        include_rag: bool,
    ) -> Result<CounterArgumentsResponse, RagError> {
        let request_id = Uuid::new_v4();
        let stance_length = input.stance.chars().count();
        info!(%request_id, topic_len = input.topic.len(), stance_length, include_rag, "generating counter-arguments");

        let retrieval = if include_rag {
            Some(self.pipeline.run(&Query::new(&input.topic, &input.stance)).await?)
        } else {
            None
        };

        let set = self.synthesizer.counter_arguments(&input.topic, &input.stance, retrieval.as_ref()).await;
        if let Some(error) = &set.error {
            warn!(%request_id, %error, strategy = ?set.strategy, "served fallback counter-arguments");
        }
        info!(%request_id, strategy = ?set.strategy, count = set.arguments.len(), "counter-arguments ready");

        Ok(CounterArgumentsResponse {
            success: true,
            counter_arguments: set.arguments,
            metadata: CounterArgumentsMetadata {
                request_id,
                topic: input.topic.clone(),
                stance_length,
                generated_at: Utc::now(),
                rag_enabled: include_rag,
                synthesis: set.strategy,
                retrieval: retrieval.as_ref().map(summarize),
                error: set.error,
            },
        })
    }

    /// Produce a conversational reply grounded in retrieved evidence.
    ///
    /// # Errors
    ///
    /// Returns [`RagError`] only when retrieval fails.
    pub async fn converse(
        &self,
        input: &DebateInput,
        history: &[ConversationTurn],
    ) -> Result<LlmDebateResponse, RagError> {
        let request_id = Uuid::new_v4();
        info!(%request_id, history_turns = history.len(), "starting conversational reply");

        let outcome = self.pipeline.run(&Query::new(&input.topic, &input.stance)).await?;
        let synthesis = self
            .synthesizer
            .synthesize(&input.topic, &input.stance, &outcome.relevant_chunks, history)
            .await;

        let success = synthesis.succeeded();
        if let Some(error) = &synthesis.error {
            warn!(%request_id, %error, "served apology instead of model reply");
        }

        let model = synthesis.model.or_else(|| self.synthesizer.model_name().map(str::to_string));
        let vector_similarity = outcome.similarity_scores().into_iter().map(round3).collect();
        let total_sources = outcome.relevant_chunks.len();

        Ok(LlmDebateResponse {
            success,
            topic: input.topic.clone(),
            user_stance: input.stance.clone(),
            llm_response: synthesis.text,
            conversational: true,
            rag_context: RagContext {
                search_results: outcome.search_results,
                vector_similarity,
                total_sources,
            },
            metadata: LlmDebateMetadata {
                request_id,
                timestamp: Utc::now(),
                response_type: if success { ResponseType::Conversational } else { ResponseType::Fallback },
                model,
                temperature: self.synthesizer.generation_config().temperature,
            },
            error: synthesis.error,
        })
    }
}

fn summarize(outcome: &RetrievalOutcome) -> RetrievalSummary {
    RetrievalSummary {
        search_results_count: outcome.search_results.len(),
        chunks_processed: outcome.chunks_processed,
        relevant_chunks_used: outcome.relevant_chunks.len(),
        average_relevance_score: round3(outcome.average_relevance_score()),
    }
}
