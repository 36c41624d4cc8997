//! Configuration for the retrieval pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for the retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    /// Number of search results requested from the retriever.
    pub search_results: usize,
    /// Number of ranked chunks handed to synthesis.
    pub top_k: usize,
    /// Sentences whose trimmed length is at or below this many characters are dropped.
    pub min_chunk_length: usize,
    /// Weight of the term-overlap component; the document relevance gets the remainder.
    pub overlap_weight: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { search_results: 5, top_k: 5, min_chunk_length: 10, overlap_weight: 0.7 }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }

    /// Weight given to the parent document's relevance score.
    pub fn relevance_weight(&self) -> f32 {
        1.0 - self.overlap_weight
    }
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set how many search results the retriever should return.
    pub fn search_results(mut self, count: usize) -> Self {
        self.config.search_results = count;
        self
    }

    /// Set the number of ranked chunks to keep.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum sentence length (exclusive) for a chunk to be kept.
    pub fn min_chunk_length(mut self, length: usize) -> Self {
        self.config.min_chunk_length = length;
        self
    }

    /// Set the term-overlap weight used when blending scores.
    pub fn overlap_weight(mut self, weight: f32) -> Self {
        self.config.overlap_weight = weight;
        self
    }

    /// Build the [`RetrievalConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `search_results == 0`
    /// - `top_k == 0`
    /// - `overlap_weight` is outside `[0, 1]`
    pub fn build(self) -> Result<RetrievalConfig> {
        if self.config.search_results == 0 {
            return Err(RagError::ConfigError(
                "search_results must be greater than zero".to_string(),
            ));
        }
        if self.config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=1.0).contains(&self.config.overlap_weight) {
            return Err(RagError::ConfigError(format!(
                "overlap_weight ({}) must be within [0, 1]",
                self.config.overlap_weight
            )));
        }
        Ok(self.config)
    }
}
