//! Retrieval backends.
//!
//! The [`Retriever`] trait is the seam where a real search backend would plug
//! in. [`MockRetriever`] fabricates a fixed set of five plausible results by
//! interpolating the topic into templates, so the rest of the pipeline can run
//! without any network access.

use async_trait::async_trait;

use crate::document::SearchDocument;
use crate::error::Result;

/// A source of search documents for a topic.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// A short name used in logs and errors.
    fn name(&self) -> &str;

    /// Return up to `k` documents relevant to `topic`.
    async fn retrieve(&self, topic: &str, k: usize) -> Result<Vec<SearchDocument>>;
}

struct Template {
    title: &'static str,
    snippet: &'static str,
    host: &'static str,
    source: &'static str,
    relevance: f32,
}

// `{q}` is replaced with the topic verbatim.
const TEMPLATES: [Template; 5] = [
    Template {
        title: "Recent Research on {q}",
        snippet: "Latest findings from 2024 research institutes show significant developments in {q}. \
                  Multiple studies indicate varying perspectives on implementation and effectiveness. \
                  Key considerations include economic impact, social implications, and long-term sustainability.",
        host: "research.org",
        source: "Academic Research Database",
        relevance: 0.92,
    },
    Template {
        title: "Policy Analysis: {q}",
        snippet: "Government policy experts have identified critical challenges with {q}. \
                  Recent analysis suggests that while benefits exist, implementation hurdles and unintended consequences require careful consideration. \
                  Cross-sector collaboration appears essential.",
        host: "policy.gov",
        source: "Policy Research Institute",
        relevance: 0.88,
    },
    Template {
        title: "Economic Impact of {q}",
        snippet: "Economic modeling reveals mixed outcomes for {q}. \
                  While some sectors may benefit, others face potential disruption. \
                  Cost-benefit analysis shows varying results across different demographics and regions, suggesting need for targeted approaches.",
        host: "economics.edu",
        source: "Economic Analysis Center",
        relevance: 0.85,
    },
    Template {
        title: "International Perspective on {q}",
        snippet: "Global case studies of {q} implementation show diverse outcomes. \
                  Countries with different economic structures and social systems have experienced varying degrees of success and failure, providing valuable lessons for policy design.",
        host: "international.org",
        source: "International Policy Forum",
        relevance: 0.82,
    },
    Template {
        title: "Industry Response to {q}",
        snippet: "Private sector analysis of {q} reveals concerns about market impacts and competitive dynamics. \
                  Industry leaders emphasize the need for regulatory clarity and gradual implementation to minimize economic disruption.",
        host: "industry.com",
        source: "Industry Analysis Group",
        relevance: 0.79,
    },
];

/// Number of templates the [`MockRetriever`] can produce.
pub const MOCK_RESULT_COUNT: usize = TEMPLATES.len();

/// A deterministic retriever that never performs I/O and never fails.
///
/// # Example
///
/// ```rust,ignore
/// use debate_rag::{MockRetriever, Retriever};
///
/// let docs = MockRetriever.retrieve("Universal basic income", 5).await?;
/// assert_eq!(docs.len(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MockRetriever;

impl MockRetriever {
    /// Synchronously build the documents for `topic`.
    pub fn documents(topic: &str, k: usize) -> Vec<SearchDocument> {
        let slug = topic.split_whitespace().collect::<Vec<_>>().join("-");
        TEMPLATES
            .iter()
            .take(k)
            .map(|t| SearchDocument {
                title: t.title.replace("{q}", topic),
                snippet: t.snippet.replace("{q}", topic),
                url: format!("https://{}/{slug}", t.host),
                source: t.source.to_string(),
                relevance_score: t.relevance,
            })
            .collect()
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    fn name(&self) -> &str {
        "mock"
    }

    async fn retrieve(&self, topic: &str, k: usize) -> Result<Vec<SearchDocument>> {
        Ok(Self::documents(topic, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_five_documents_in_template_order() {
        let docs = MockRetriever::documents("Universal basic income", 5);
        assert_eq!(docs.len(), 5);
        let scores: Vec<f32> = docs.iter().map(|d| d.relevance_score).collect();
        assert_eq!(scores, vec![0.92, 0.88, 0.85, 0.82, 0.79]);
        assert_eq!(docs[0].title, "Recent Research on Universal basic income");
        assert_eq!(docs[2].source, "Economic Analysis Center");
    }

    #[test]
    fn url_slug_replaces_whitespace_runs() {
        let docs = MockRetriever::documents("Nuclear   power plants", 1);
        assert_eq!(docs[0].url, "https://research.org/Nuclear-power-plants");
    }

    #[test]
    fn caps_at_template_count() {
        assert_eq!(MockRetriever::documents("topic", 50).len(), MOCK_RESULT_COUNT);
        assert_eq!(MockRetriever::documents("topic", 2).len(), 2);
        assert!(MockRetriever::documents("topic", 0).is_empty());
    }

    #[test]
    fn snippets_embed_topic() {
        for doc in MockRetriever::documents("space exploration", 5) {
            assert!(doc.snippet.contains("space exploration"), "{}", doc.snippet);
            assert!(!doc.snippet.contains("{q}"));
        }
    }
}
