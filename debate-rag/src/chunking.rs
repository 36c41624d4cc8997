//! Sentence chunking of search snippets.

use crate::document::{Chunk, SearchDocument};

/// A strategy for splitting search documents into chunks.
pub trait Chunker: Send + Sync {
    /// Split `documents` into chunks, in document order then sentence order.
    fn chunk(&self, documents: &[SearchDocument]) -> Vec<Chunk>;
}

/// Splits snippets on runs of `.`, `!` and `?`, keeping sentences whose
/// trimmed length exceeds `min_length` characters.
///
/// Chunk IDs are generated as `chunk_{document_index}_{sentence_index}`, where
/// the sentence index counts only the kept sentences.
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    min_length: usize,
}

impl SentenceChunker {
    /// Create a chunker that drops sentences of `min_length` characters or fewer.
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, documents: &[SearchDocument]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for (doc_index, document) in documents.iter().enumerate() {
            let sentences = document
                .snippet
                .split(['.', '!', '?'])
                .map(str::trim)
                .filter(|s| s.chars().count() > self.min_length);

            for (sentence_index, sentence) in sentences.enumerate() {
                chunks.push(Chunk {
                    id: format!("chunk_{doc_index}_{sentence_index}"),
                    content: sentence.to_string(),
                    source: document.source.clone(),
                    title: document.title.clone(),
                    url: document.url.clone(),
                    original_relevance: document.relevance_score,
                });
            }
        }
        chunks
    }
}
