//! Data types for queries, search documents, chunks, and ranked chunks.

use serde::{Deserialize, Serialize};

/// A debate query: the topic under discussion and the user's stance on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// The debate topic.
    pub topic: String,
    /// The user's stated position.
    pub stance: String,
}

impl Query {
    /// Create a query from a topic and a stance.
    pub fn new(topic: impl Into<String>, stance: impl Into<String>) -> Self {
        Self { topic: topic.into(), stance: stance.into() }
    }

    /// The combined search string `"<topic> <stance>"` with whitespace runs collapsed.
    pub fn normalized(&self) -> String {
        self.topic.split_whitespace().chain(self.stance.split_whitespace()).collect::<Vec<_>>().join(" ")
    }

    /// Lower-cased, whitespace-delimited terms of the normalized query.
    pub fn terms(&self) -> Vec<String> {
        self.normalized().split_whitespace().map(str::to_lowercase).collect()
    }
}

/// A search result returned by a [`Retriever`](crate::Retriever).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
    /// Headline of the result.
    pub title: String,
    /// Short passage of body text; chunking operates on this.
    pub snippet: String,
    /// Link to the (synthetic) source.
    pub url: String,
    /// Human-readable name of the publishing source.
    pub source: String,
    /// Retriever-assigned relevance in `[0, 1]`.
    pub relevance_score: f32,
}

/// One sentence of a [`SearchDocument`] snippet, carrying its provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Identifier of the form `chunk_{document_index}_{sentence_index}`.
    pub id: String,
    /// The trimmed sentence text.
    pub content: String,
    /// Source name inherited from the parent document.
    pub source: String,
    /// Title inherited from the parent document.
    pub title: String,
    /// URL inherited from the parent document.
    pub url: String,
    /// Relevance score of the parent document.
    pub original_relevance: f32,
}

/// A [`Chunk`] paired with its blended similarity score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedChunk {
    /// The scored chunk.
    #[serde(flatten)]
    pub chunk: Chunk,
    /// Blended score in `[0, 1]` (higher is more relevant).
    pub similarity_score: f32,
}
