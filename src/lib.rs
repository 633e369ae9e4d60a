//! Semfind library crate (used by the `semfind` binary and integration tests).
//!
//! Finds the 1-3 word phrase of a document that is closest in meaning to a query,
//! using sentence embeddings and cosine similarity, refined by the text around it.
//!
//! # Public API Surface
//!
//! ## Core
//! - [`MatchEngine`], [`MatchParams`], [`MatchOutcome`], [`MatchResult`] - phrase matching
//! - [`tokenize`], [`generate_candidates`] - word runs and candidate phrases
//! - [`cosine_similarity`], [`blend_scores`] - score arithmetic
//!
//! ## Embedding
//! - [`Embedder`] - text to vector capability
//! - [`SentenceEmbedder`], [`EncoderConfig`] - BERT sentence encoder (or stub)
//! - [`LazyEmbedder`] - load-once wrapper
//!
//! ## Serving
//! - [`MatchService`] - empty-query fallback, caching and summaries
//! - [`ResultCache`], [`CachePolicy`] - exact-key result memoization
//! - [`Config`] - `SEMFIND_*` environment configuration
//! - [`gateway`] and [`cli`] - the HTTP and command-line front ends
//!
//! ## Test/Mock Support
//! Scripted embedders are available behind `#[cfg(any(test, feature = "mock"))]`.
//!
//! ```
//! use semfind::{EncoderConfig, MatchEngine, SentenceEmbedder};
//!
//! let embedder = SentenceEmbedder::load(EncoderConfig::stub()).unwrap();
//! let engine = MatchEngine::new(embedder);
//!
//! let outcome = engine.find_match("быстрая лиса прыгает", "лиса", 0.6).unwrap();
//! let result = outcome.accepted().unwrap();
//! assert_eq!(result.matched_text(), "лиса");
//! assert_eq!(result.position(), "8 - 12");
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod matching;
pub mod scoring;
pub mod service;
pub mod telemetry;
pub mod text;

pub use cache::{CacheLookup, CachePolicy, ResultCache};
pub use config::{Config, ConfigError};
pub use embedding::{Embedder, EmbeddingError, EncoderConfig, LazyEmbedder, SentenceEmbedder};
pub use matching::{MatchEngine, MatchError, MatchOutcome, MatchParams, MatchResult, RejectReason};
pub use scoring::{best_index, blend_scores, cosine_similarity};
pub use service::{MatchService, Prediction, ServiceError};
pub use text::{Candidate, CandidateKind, Token, generate_candidates, tokenize};
