//! Error types for the `debate-rag` crate.

use thiserror::Error;

/// Errors that can occur while retrieving and ranking evidence.
#[derive(Debug, Error)]
pub enum RagError {
    /// The retriever could not produce documents.
    #[error("Retrieval error ({retriever}): {message}")]
    RetrievalError {
        /// The retriever that produced the error.
        retriever: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the retrieval pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
