//! Retrieval pipeline orchestrator.
//!
//! The [`RetrievalPipeline`] runs the retrieve → chunk → score → select
//! workflow for one [`Query`] by composing a [`Retriever`], a [`Chunker`] and
//! a [`RelevanceScorer`].
//!
//! # Example
//!
//! ```rust,ignore
//! use debate_rag::{MockRetriever, Query, RetrievalConfig, RetrievalPipeline};
//!
//! let pipeline = RetrievalPipeline::builder()
//!     .config(RetrievalConfig::default())
//!     .retriever(Arc::new(MockRetriever))
//!     .build()?;
//!
//! let outcome = pipeline.run(&Query::new("Remote work", "It saves commute costs")).await?;
//! assert_eq!(outcome.relevant_chunks.len(), 5);
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::chunking::{Chunker, SentenceChunker};
use crate::config::RetrievalConfig;
use crate::document::{Query, RankedChunk, SearchDocument};
use crate::error::{RagError, Result};
use crate::retriever::{MockRetriever, Retriever};
use crate::scoring::{RelevanceScorer, TermOverlapScorer, select_top_k};

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalOutcome {
    /// Documents returned by the retriever.
    pub search_results: Vec<SearchDocument>,
    /// Number of chunks produced before ranking.
    pub chunks_processed: usize,
    /// Top-k ranked chunks, highest score first.
    pub relevant_chunks: Vec<RankedChunk>,
}

impl RetrievalOutcome {
    /// Mean similarity score of the selected chunks, or `0.0` when none were selected.
    pub fn average_relevance_score(&self) -> f32 {
        if self.relevant_chunks.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.relevant_chunks.iter().map(|c| c.similarity_score).sum();
        sum / self.relevant_chunks.len() as f32
    }

    /// Similarity scores of the selected chunks, in rank order.
    pub fn similarity_scores(&self) -> Vec<f32> {
        self.relevant_chunks.iter().map(|c| c.similarity_score).collect()
    }
}

/// The retrieval pipeline orchestrator.
///
/// Stateless between runs; share it behind an `Arc`. Construct one via
/// [`RetrievalPipeline::builder()`].
pub struct RetrievalPipeline {
    config: RetrievalConfig,
    retriever: Arc<dyn Retriever>,
    chunker: Arc<dyn Chunker>,
    scorer: Arc<dyn RelevanceScorer>,
}

impl RetrievalPipeline {
    /// Create a new [`RetrievalPipelineBuilder`].
    pub fn builder() -> RetrievalPipelineBuilder {
        RetrievalPipelineBuilder::default()
    }

    /// A pipeline over the [`MockRetriever`] with components derived from `config`.
    pub fn mock(config: RetrievalConfig) -> Self {
        let chunker = Arc::new(SentenceChunker::new(config.min_chunk_length));
        let scorer = Arc::new(TermOverlapScorer::new(config.overlap_weight));
        Self { config, retriever: Arc::new(MockRetriever), chunker, scorer }
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Run retrieval for `query`: retrieve → chunk → score → select top-k.
    ///
    /// The retriever sees only the topic; scoring uses the normalized
    /// topic-plus-stance query.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the retriever fails.
    pub async fn run(&self, query: &Query) -> Result<RetrievalOutcome> {
        // 1. Retrieve documents for the topic
        let search_results = self
            .retriever
            .retrieve(&query.topic, self.config.search_results)
            .await
            .map_err(|e| {
                error!(retriever = self.retriever.name(), error = %e, "retrieval failed");
                RagError::PipelineError(format!(
                    "retrieval failed for topic '{}': {e}",
                    query.topic
                ))
            })?;
        debug!(document_count = search_results.len(), "retrieved documents");

        // 2. Split snippets into sentence chunks
        let chunks = self.chunker.chunk(&search_results);
        let chunks_processed = chunks.len();

        // 3. Score against the combined query, then keep the best
        let ranked = self.scorer.score(query, chunks);
        let relevant_chunks = select_top_k(ranked, self.config.top_k);

        info!(
            document_count = search_results.len(),
            chunks_processed,
            selected = relevant_chunks.len(),
            "retrieval completed"
        );

        Ok(RetrievalOutcome { search_results, chunks_processed, relevant_chunks })
    }
}

/// Builder for constructing a [`RetrievalPipeline`].
///
/// Only the retriever is required. The chunker and scorer default to
/// [`SentenceChunker`] and [`TermOverlapScorer`] configured from the
/// [`RetrievalConfig`], which itself defaults to [`RetrievalConfig::default()`].
#[derive(Default)]
pub struct RetrievalPipelineBuilder {
    config: Option<RetrievalConfig>,
    retriever: Option<Arc<dyn Retriever>>,
    chunker: Option<Arc<dyn Chunker>>,
    scorer: Option<Arc<dyn RelevanceScorer>>,
}

impl RetrievalPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RetrievalConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document retriever.
    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Override the chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Override the relevance scorer.
    pub fn scorer(mut self, scorer: Arc<dyn RelevanceScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Build the [`RetrievalPipeline`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if no retriever was set.
    pub fn build(self) -> Result<RetrievalPipeline> {
        let config = self.config.unwrap_or_default();
        let retriever = self
            .retriever
            .ok_or_else(|| RagError::ConfigError("retriever is required".to_string()))?;
        let chunker =
            self.chunker.unwrap_or_else(|| Arc::new(SentenceChunker::new(config.min_chunk_length)));
        let scorer =
            self.scorer.unwrap_or_else(|| Arc::new(TermOverlapScorer::new(config.overlap_weight)));

        Ok(RetrievalPipeline { config, retriever, chunker, scorer })
    }
}
