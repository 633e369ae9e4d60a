//! Text → match candidates.
//!
//! - [`tokenize`] splits a document into maximal runs of word characters.
//! - [`candidates`] turns the token stream into 1-, 2- and 3-token phrases.
//!
//! All offsets are character (Unicode scalar value) indices into the original document,
//! not byte offsets.

pub mod candidates;
pub mod tokenize;

pub use candidates::{Candidate, CandidateKind, char_window, generate_candidates};
pub use tokenize::{Token, tokenize};
