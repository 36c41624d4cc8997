//! Keyword theme detection and research search terms.

/// Themes a stance can touch on, detected by substring match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeSignals {
    pub economic: bool,
    pub social: bool,
    pub environmental: bool,
    pub technical: bool,
    pub policy: bool,
    /// Absolute wording such as "always" or "should".
    pub absolute: bool,
    /// The stance runs longer than [`LONG_STANCE_CHARS`].
    pub long_form: bool,
}

/// Stances longer than this many characters trigger the complexity argument.
pub const LONG_STANCE_CHARS: usize = 500;

const ECONOMIC: &[&str] = &["cost", "money", "economic", "budget"];
const SOCIAL: &[&str] = &["people", "society", "community", "social"];
const ENVIRONMENTAL: &[&str] = &["environment", "climate", "green", "sustainable"];
const TECHNICAL: &[&str] = &["technology", "ai", "digital", "tech"];
const POLICY: &[&str] = &["government", "law", "policy", "regulation"];
const ABSOLUTE: &[&str] = &["always", "never", "must", "should"];

fn mentions(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

impl ThemeSignals {
    /// Detect themes from the lower-cased stance (and the topic, for climate).
    pub fn detect(topic: &str, stance: &str) -> Self {
        let stance_lower = stance.to_lowercase();
        let topic_lower = topic.to_lowercase();
        Self {
            economic: mentions(&stance_lower, ECONOMIC),
            social: mentions(&stance_lower, SOCIAL),
            environmental: mentions(&stance_lower, ENVIRONMENTAL) || topic_lower.contains("climate"),
            technical: mentions(&stance_lower, TECHNICAL),
            policy: mentions(&stance_lower, POLICY),
            absolute: mentions(&stance_lower, ABSOLUTE),
            long_form: stance.chars().count() > LONG_STANCE_CHARS,
        }
    }
}

/// Research terms associated with an argument theme.
fn theme_terms(theme: &str) -> [&'static str; 3] {
    match theme {
        "economic" => ["cost analysis", "economic impact", "financial implications"],
        "environmental" => ["environmental impact", "sustainability", "ecological effects"],
        "social" => ["social implications", "community impact", "demographic effects"],
        "technical" => ["technical feasibility", "implementation challenges", "technology adoption"],
        "policy" => ["policy implications", "regulatory framework", "governance"],
        "technical-policy" => ["technical feasibility", "regulatory framework", "policy implications"],
        "contextual" => ["contextual factors", "situational variables", "case studies"],
        "complexity" => ["systems analysis", "complexity theory", "emergent properties"],
        _ => ["recent studies", "expert analysis", "current research"],
    }
}

/// Simulated web search terms: the first three topic words plus theme terms.
pub fn search_terms(topic: &str, theme: &str) -> Vec<String> {
    topic
        .split_whitespace()
        .take(3)
        .chain(theme_terms(theme))
        .map(str::to_string)
        .collect()
}
