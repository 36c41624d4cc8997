//! Error types for the `debate-model` crate.

use thiserror::Error;

/// Errors that can occur when calling a language model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The client was misconfigured (missing key, bad URL, ...).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The request could not be sent or the connection failed.
    #[error("Request error ({provider}): {message}")]
    RequestError {
        /// The provider being called.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request to {provider} timed out")]
    Timeout {
        /// The provider being called.
        provider: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Provider-supplied error detail.
        message: String,
    },

    /// The provider refused to answer (safety or policy block).
    #[error("Response blocked: {0}")]
    Blocked(String),

    /// The provider answered but produced no text.
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl ModelError {
    /// Whether the failure is an authentication or authorization rejection.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::ApiError { status: 401 | 403, .. })
    }

    /// Whether the failure is a quota or rate-limit rejection.
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::ApiError { status: 429, .. })
    }
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
