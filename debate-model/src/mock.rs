use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::llm::{Llm, LlmRequest, LlmResponse};

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    Fail(String),
}

/// Deterministic [`Llm`] for tests: answers with a fixed reply or fails with
/// a fixed message, and records every request it receives.
#[derive(Debug)]
pub struct MockLlm {
    name: String,
    behavior: Behavior,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    /// A mock that always replies with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(text.into()))
    }

    /// A mock whose every call fails with a request error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self { name: "mock-llm".to_string(), behavior, requests: Mutex::new(Vec::new()) }
    }

    /// Override the reported model name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        match &self.behavior {
            Behavior::Reply(text) => Ok(LlmResponse {
                text: text.trim().to_string(),
                model: self.name.clone(),
                finish_reason: Some("STOP".to_string()),
                usage: None,
            }),
            Behavior::Fail(message) => {
                Err(ModelError::RequestError { provider: "mock".into(), message: message.clone() })
            }
        }
    }
}
