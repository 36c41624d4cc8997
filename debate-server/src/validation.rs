//! Request field validation shared by the debate endpoints.

use crate::error::ApiError;

/// Counter-argument stances must be at least this many characters (after trimming).
pub const MIN_STANCE_CHARS: usize = 10;

/// Topics longer than this many characters are rejected.
pub const MAX_TOPIC_CHARS: usize = 500;

pub const MISSING_COUNTER_ARGUMENT_FIELDS: &str = "Topic and user stance are required";
pub const MISSING_DEBATE_FIELDS: &str = "Topic and stance are required";

/// A topic and stance that passed validation, both trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateInput {
    pub topic: String,
    pub stance: String,
}

/// Validate raw request fields.
///
/// Missing or blank fields produce `missing_message`; the other checks have
/// fixed messages. A `min_stance_chars` of zero only requires a non-blank
/// stance, which lets short positions such as `FOR` through.
pub fn validate_input(
    topic: Option<&str>,
    stance: Option<&str>,
    missing_message: &str,
    min_stance_chars: usize,
) -> Result<DebateInput, ApiError> {
    let topic = topic.map(str::trim).unwrap_or_default();
    let stance = stance.map(str::trim).unwrap_or_default();

    if topic.is_empty() || stance.is_empty() {
        return Err(ApiError::BadRequest(missing_message.to_string()));
    }
    if stance.chars().count() < min_stance_chars {
        return Err(ApiError::BadRequest(format!(
            "Please provide a more detailed stance (at least {min_stance_chars} characters)"
        )));
    }
    if topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Topic must be at most {MAX_TOPIC_CHARS} characters"
        )));
    }

    Ok(DebateInput { topic: topic.to_string(), stance: stance.to_string() })
}
