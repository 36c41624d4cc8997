//! # debate-server
//!
//! HTTP JSON API for the AI debate partner.
//!
//! The server validates a topic and stance, runs the deterministic retrieval
//! pipeline from `debate-rag`, and hands the ranked evidence to the
//! `debate-synth` synthesizer. Language model failures never surface as HTTP
//! errors; callers get template arguments or a fixed apology instead.
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/health` | Liveness |
//! | GET | `/api/rag-status` | Capability descriptor |
//! | POST | `/api/generate-counter-arguments` | Three counter-arguments |
//! | POST | `/api/llm-debate` | Conversational reply |
//! | GET/POST | `/api/debates`, `/api/ai-debates` | Legacy placeholders |
//!
//! ## Embedding
//!
//! ```rust,ignore
//! use debate_server::{ServerConfig, build_state, app_router};
//!
//! let state = build_state(&ServerConfig::default())?;
//! let app = app_router(state);
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod rate_limit;
pub mod server;
pub mod service;
pub mod telemetry;
pub mod validation;

pub use config::{ConfigError, LanguageModelConfig, RateLimitConfig, ServerConfig};
pub use error::ApiError;
pub use rate_limit::RateLimiter;
pub use server::{AppState, app_router, build_state, run_server};
pub use service::DebateService;
pub use telemetry::{LogFormat, init_tracing};
