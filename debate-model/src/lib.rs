//! # debate-model
//!
//! Language model integration for the debate partner.
//!
//! ## Overview
//!
//! - [`Llm`] - the text generation seam used by the synthesizer
//! - [`GeminiModel`] - Google's Gemini models over the REST `generateContent` API
//! - [`MockLlm`] - deterministic stand-in for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use debate_model::GeminiModel;
//!
//! let api_key = std::env::var("GEMINI_API_KEY").unwrap();
//! let model = GeminiModel::new(api_key, "gemini-2.5-flash").unwrap();
//! ```
//!
//! ## Generation defaults
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | `temperature` | 0.9 |
//! | `topP` | 0.8 |
//! | `topK` | 40 |
//! | `maxOutputTokens` | 2048 |

pub mod error;
pub mod gemini;
pub mod llm;
pub mod mock;

pub use error::{ModelError, Result};
pub use gemini::{DEFAULT_GEMINI_MODEL, DEFAULT_TIMEOUT, GEMINI_API_BASE, GeminiModel};
pub use llm::{GenerationConfig, Llm, LlmRequest, LlmResponse, UsageMetadata};
pub use mock::MockLlm;
