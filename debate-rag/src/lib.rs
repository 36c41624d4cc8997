//! # debate-rag
//!
//! Deterministic retrieval pipeline for the debate partner.
//!
//! A [`Query`] (topic plus stance) flows through four stages:
//!
//! 1. a [`Retriever`] returns [`SearchDocument`]s for the topic
//! 2. a [`Chunker`] splits their snippets into sentence [`Chunk`]s
//! 3. a [`RelevanceScorer`] ranks chunks against the combined query
//! 4. [`select_top_k`] keeps the best ones
//!
//! [`RetrievalPipeline`] wires the stages together. The bundled
//! [`MockRetriever`] fabricates five templated results and never touches the
//! network, so the whole pipeline is pure apart from its async signature.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use debate_rag::{Query, RetrievalConfig, RetrievalPipeline};
//!
//! let pipeline = RetrievalPipeline::mock(RetrievalConfig::default());
//! let outcome = pipeline.run(&Query::new("Nuclear power", "It is too expensive")).await?;
//! for chunk in &outcome.relevant_chunks {
//!     println!("{:.3} {}", chunk.similarity_score, chunk.chunk.content);
//! }
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod retriever;
pub mod scoring;

pub use chunking::{Chunker, SentenceChunker};
pub use config::{RetrievalConfig, RetrievalConfigBuilder};
pub use document::{Chunk, Query, RankedChunk, SearchDocument};
pub use error::{RagError, Result};
pub use pipeline::{RetrievalOutcome, RetrievalPipeline, RetrievalPipelineBuilder};
pub use retriever::{MOCK_RESULT_COUNT, MockRetriever, Retriever};
pub use scoring::{RelevanceScorer, TermOverlapScorer, select_top_k, term_overlap};
