//! Prompt construction and the fixed apology text.

use debate_rag::RankedChunk;
use serde::{Deserialize, Serialize};

/// Number of trailing conversation turns embedded in a prompt.
pub const HISTORY_TURNS: usize = 2;

/// One prior message in a client-held conversation.
///
/// Clients send `{ "type": "user" | "ai", "content": ..., ... }`; extra
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(alias = "type", default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

fn default_role() -> String {
    "user".to_string()
}

impl ConversationTurn {
    /// Whether this turn was spoken by the assistant.
    pub fn is_assistant(&self) -> bool {
        matches!(self.role.to_ascii_lowercase().as_str(), "ai" | "assistant" | "model")
    }
}

/// Build the conversational, first-person prompt sent to the language model.
pub fn debate_prompt(
    topic: &str,
    stance: &str,
    chunks: &[RankedChunk],
    history: &[ConversationTurn],
) -> String {
    let context = if chunks.is_empty() {
        "Recent discussions and research on this topic".to_string()
    } else {
        chunks.iter().map(|c| c.chunk.content.as_str()).collect::<Vec<_>>().join("\n\n")
    };

    let mut prompt = format!(
        "You are talking with someone about \"{topic}\". They just told you their stance: \"{stance}\".\n\
         \n\
         Research notes gathered for this conversation:\n\
         {context}\n\
         \n\
         Reply in the first person, conversationally. Engage with their specific position, \
         push back where the evidence suggests weaknesses, bring in concrete points from the notes, \
         and ask a thoughtful follow-up question. Avoid generic or templated phrasing.\n"
    );

    let recent = &history[history.len().saturating_sub(HISTORY_TURNS)..];
    if !recent.is_empty() {
        prompt.push_str("\nEarlier in this conversation:\n");
        for turn in recent {
            let speaker = if turn.is_assistant() { "You" } else { "Them" };
            prompt.push_str(&format!("- {speaker}: {}\n", turn.content.trim()));
        }
    }

    prompt.push_str(&format!(
        "\nStay specific to \"{topic}\" and to someone who believes \"{stance}\"."
    ));
    prompt
}

/// The in-character reply used whenever the language model cannot answer.
pub fn apology(topic: &str, stance: &str) -> String {
    format!(
        "I apologize, but I'm having trouble connecting to my AI processing right now. \
         This seems like a fascinating topic about \"{topic}\" and I'd love to discuss your \
         \"{stance}\" perspective, but I need a moment to get my systems back online. \
         Could you try again in a moment?"
    )
}
