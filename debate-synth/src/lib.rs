//! # debate-synth
//!
//! Turns retrieved evidence into replies and counter-arguments.
//!
//! The [`Synthesizer`] has two jobs:
//!
//! - [`Synthesizer::synthesize`] produces a conversational reply from the
//!   language model, or a fixed apology when the model cannot answer.
//! - [`Synthesizer::counter_arguments`] always produces exactly three
//!   [`CounterArgument`]s. Depending on [`SynthesisMode`] and whether
//!   retrieval ran, they come from model paragraphs, from retrieved chunks
//!   framed by a template, or from keyword-matched canned arguments.

pub mod argument;
pub mod heuristic;
pub mod prompt;
pub mod synthesizer;
pub mod themes;

pub use argument::{ARGUMENT_COUNT, ArgumentOrigin, ArgumentSet, CounterArgument, Strategy, round3};
pub use heuristic::{enrich_with_retrieval, keyword_arguments, retrieval_fallback_arguments};
pub use prompt::{ConversationTurn, apology, debate_prompt};
pub use synthesizer::{Synthesis, SynthesisMode, Synthesizer};
pub use themes::{ThemeSignals, search_terms};
