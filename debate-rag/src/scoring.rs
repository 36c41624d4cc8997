//! Relevance scoring and top-k selection.
//!
//! [`TermOverlapScorer`] blends a lexical overlap measure between the query
//! and each chunk with the relevance of the chunk's parent document:
//!
//! ```text
//! score = w * term_overlap + (1 - w) * original_relevance     (clamped to [0, 1])
//! ```
//!
//! `term_overlap` is the mean, over the lower-cased query terms, of the
//! fraction of chunk terms that contain the query term or are contained in it.

use crate::document::{Chunk, Query, RankedChunk};

/// Assigns a similarity score to each chunk and orders them.
pub trait RelevanceScorer: Send + Sync {
    /// Score `chunks` against `query`, returning them sorted by descending score.
    ///
    /// Chunks with equal scores keep their input order.
    fn score(&self, query: &Query, chunks: Vec<Chunk>) -> Vec<RankedChunk>;
}

/// Lexical term-overlap scorer blended with document relevance.
#[derive(Debug, Clone)]
pub struct TermOverlapScorer {
    overlap_weight: f32,
}

impl TermOverlapScorer {
    /// Create a scorer giving `overlap_weight` to term overlap and the
    /// remainder to the parent document's relevance.
    pub fn new(overlap_weight: f32) -> Self {
        Self { overlap_weight: overlap_weight.clamp(0.0, 1.0) }
    }

    /// Blend a term overlap with a document relevance into a score in `[0, 1]`.
    pub fn blend(&self, term_overlap: f32, original_relevance: f32) -> f32 {
        let score =
            self.overlap_weight * term_overlap + (1.0 - self.overlap_weight) * original_relevance;
        if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) }
    }
}

impl Default for TermOverlapScorer {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl RelevanceScorer for TermOverlapScorer {
    fn score(&self, query: &Query, chunks: Vec<Chunk>) -> Vec<RankedChunk> {
        let query_terms = query.terms();
        let mut ranked: Vec<RankedChunk> = chunks
            .into_iter()
            .map(|chunk| {
                let overlap = term_overlap(&query_terms, &chunk.content);
                let similarity_score = self.blend(overlap, chunk.original_relevance);
                RankedChunk { chunk, similarity_score }
            })
            .collect();

        // `sort_by` is stable, so ties keep emission order.
        ranked.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        ranked
    }
}

/// Mean fraction of `content` terms matching each query term, in `[0, 1]`.
///
/// A chunk term matches when either string contains the other. Returns `0.0`
/// when there are no query terms or the content has no terms.
pub fn term_overlap(query_terms: &[String], content: &str) -> f32 {
    let chunk_terms: Vec<String> = content.split_whitespace().map(str::to_lowercase).collect();
    if query_terms.is_empty() || chunk_terms.is_empty() {
        return 0.0;
    }

    let total: f32 = query_terms
        .iter()
        .map(|term| {
            let matches = chunk_terms
                .iter()
                .filter(|t| t.contains(term.as_str()) || term.contains(t.as_str()))
                .count();
            matches as f32 / chunk_terms.len() as f32
        })
        .sum();

    total / query_terms.len() as f32
}

/// Keep the first `k` ranked chunks, preserving order.
pub fn select_top_k(mut ranked: Vec<RankedChunk>, k: usize) -> Vec<RankedChunk> {
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, content: &str, relevance: f32) -> Chunk {
        Chunk {
            id: id.to_string(),
            content: content.to_string(),
            source: "Source".to_string(),
            title: "Title".to_string(),
            url: "https://example.org".to_string(),
            original_relevance: relevance,
        }
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn overlap_is_zero_for_empty_inputs() {
        assert_eq!(term_overlap(&[], "some content"), 0.0);
        assert_eq!(term_overlap(&terms(&["solar"]), "   "), 0.0);
    }

    #[test]
    fn overlap_matches_substrings_both_ways() {
        // "cost" is inside "costs", and "co" is inside "cost"
        let overlap = term_overlap(&terms(&["cost"]), "costs co lot");
        assert!((overlap - 2.0 / 3.0).abs() < 1e-6, "{overlap}");
    }

    #[test]
    fn overlap_is_mean_over_query_terms() {
        let overlap = term_overlap(&terms(&["solar", "wind"]), "Solar panels");
        assert!((overlap - 0.25).abs() < 1e-6, "{overlap}");
    }

    #[test]
    fn blend_uses_weights_and_clamps() {
        let scorer = TermOverlapScorer::default();
        assert!((scorer.blend(1.0, 0.0) - 0.7).abs() < 1e-6);
        assert!((scorer.blend(0.0, 1.0) - 0.3).abs() < 1e-6);
        assert_eq!(scorer.blend(2.0, 2.0), 1.0);
        assert_eq!(scorer.blend(f32::NAN, 0.5), 0.0);
    }

    #[test]
    fn score_sorts_descending_and_keeps_tie_order() {
        let query = Query::new("solar", "energy");
        let ranked = TermOverlapScorer::default().score(
            &query,
            vec![
                chunk("a", "unrelated words here", 0.5),
                chunk("b", "solar energy matters", 0.5),
                chunk("c", "unrelated words there", 0.5),
            ],
        );
        let ids: Vec<&str> = ranked.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn select_top_k_truncates() {
        let ranked: Vec<RankedChunk> = (0..7)
            .map(|i| RankedChunk { chunk: chunk(&i.to_string(), "x", 0.1), similarity_score: 0.1 })
            .collect();
        assert_eq!(select_top_k(ranked.clone(), 5).len(), 5);
        assert_eq!(select_top_k(ranked.clone(), 10).len(), 7);
        assert_eq!(select_top_k(ranked, 0).len(), 0);
    }
}
