//! Environment-driven server configuration.
//!
//! Every setting is read through a lookup closure so tests can supply a map
//! instead of mutating the process environment.

use std::str::FromStr;
use std::time::Duration;

use debate_model::{DEFAULT_GEMINI_MODEL, DEFAULT_TIMEOUT};
use debate_rag::{RagError, RetrievalConfig};
use debate_synth::SynthesisMode;
use thiserror::Error;

use crate::telemetry::LogFormat;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// Retrieval settings failed validation.
    #[error(transparent)]
    Retrieval(#[from] RagError),
}

/// Credentials and transport settings for the language model.
#[derive(Clone)]
pub struct LanguageModelConfig {
    pub api_key: String,
    pub model: String,
    /// Overrides the public Gemini endpoint when set.
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for LanguageModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sliding-window limit applied per client to the POST API routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window; zero disables limiting.
    pub max_requests: usize,
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn enabled(&self) -> bool {
        self.max_requests > 0
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { max_requests: 30, window: Duration::from_secs(60) }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None` when no usable API key is configured.
    pub language_model: Option<LanguageModelConfig>,
    pub synthesis: SynthesisMode,
    pub retrieval: RetrievalConfig,
    pub rate_limit: RateLimitConfig,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            language_model: None,
            synthesis: SynthesisMode::KeywordHeuristic,
            retrieval: RetrievalConfig::default(),
            rate_limit: RateLimitConfig::default(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset or blank variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let host = get("DEBATE_HOST").unwrap_or(defaults.host);
        let port = match (get("DEBATE_PORT"), get("PORT")) {
            (Some(value), _) => parse("DEBATE_PORT", value)?,
            (None, Some(value)) => parse("PORT", value)?,
            (None, None) => defaults.port,
        };

        let language_model = match get("GEMINI_API_KEY").filter(|key| !is_placeholder(key)) {
            Some(api_key) => Some(LanguageModelConfig {
                api_key,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: get("GEMINI_BASE_URL"),
                timeout: match get("GEMINI_TIMEOUT_SECS") {
                    Some(value) => Duration::from_secs(parse_positive("GEMINI_TIMEOUT_SECS", value)?),
                    None => DEFAULT_TIMEOUT,
                },
            }),
            None => None,
        };

        let synthesis = match get("DEBATE_SYNTHESIS") {
            Some(value) => parse("DEBATE_SYNTHESIS", value)?,
            None if language_model.is_some() => SynthesisMode::LanguageModel,
            None => SynthesisMode::KeywordHeuristic,
        };

        let mut retrieval = RetrievalConfig::builder();
        if let Some(value) = get("DEBATE_TOP_K") {
            retrieval = retrieval.top_k(parse("DEBATE_TOP_K", value)?);
        }
        if let Some(value) = get("DEBATE_SEARCH_RESULTS") {
            retrieval = retrieval.search_results(parse("DEBATE_SEARCH_RESULTS", value)?);
        }
        let retrieval = retrieval.build()?;

        let mut rate_limit = defaults.rate_limit;
        if let Some(value) = get("DEBATE_RATE_LIMIT_MAX") {
            rate_limit.max_requests = parse("DEBATE_RATE_LIMIT_MAX", value)?;
        }
        if let Some(value) = get("DEBATE_RATE_LIMIT_WINDOW_SECS") {
            rate_limit.window = Duration::from_secs(parse("DEBATE_RATE_LIMIT_WINDOW_SECS", value)?);
        }

        let log_format = match get("DEBATE_LOG_FORMAT") {
            Some(value) => parse("DEBATE_LOG_FORMAT", value)?,
            None => defaults.log_format,
        };

        Ok(Self { host, port, language_model, synthesis, retrieval, rate_limit, log_format })
    }
}

// Template `.env` files ship with values like `your_gemini_api_key_here`.
fn is_placeholder(key: &str) -> bool {
    key.starts_with("your_") || key.eq_ignore_ascii_case("changeme")
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::Invalid { var, reason: e.to_string(), value })
}

// A zero timeout would fail every model call.
fn parse_positive(var: &'static str, value: String) -> Result<u64, ConfigError> {
    match parse::<u64>(var, value.clone())? {
        0 => Err(ConfigError::Invalid { var, value, reason: "must be greater than zero".to_string() }),
        n => Ok(n),
    }
}
