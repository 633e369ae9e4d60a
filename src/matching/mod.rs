//! Semantic phrase matching.
//!
//! Given a document and a query, [`MatchEngine`] scores every 1-3 word phrase of the
//! document against the query, keeps the best one, refines its score with the
//! surrounding text, and accepts it when the blended score reaches the threshold.
//!
//! ```text
//! document ──tokenize──▶ candidates ──encode_batch──▶ cosine vs query ──▶ best
//!                                                                    │
//!                          context window (±context_chars) ◀─────────┘
//!                                   │
//!                 score = w·candidate + (1-w)·context  ≥ threshold ?
//! ```

mod engine;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use engine::MatchEngine;
pub use error::MatchError;
pub use types::{MatchOutcome, MatchParams, MatchResult, RejectReason};
