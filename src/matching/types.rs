use serde::Serialize;

use crate::constants::{DEFAULT_CONTEXT_CHARS, DEFAULT_CONTEXT_WEIGHT};
use crate::text::Candidate;

/// Context-refinement knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchParams {
    /// Characters added on each side of the best candidate for the context window.
    pub context_chars: usize,
    /// Weight of the candidate score; the context score gets `1 - context_weight`.
    /// Expected in `[0, 1]` but not validated.
    pub context_weight: f32,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            context_chars: DEFAULT_CONTEXT_CHARS,
            context_weight: DEFAULT_CONTEXT_WEIGHT,
        }
    }
}

impl MatchParams {
    pub fn with_context_chars(mut self, context_chars: usize) -> Self {
        self.context_chars = context_chars;
        self
    }

    pub fn with_context_weight(mut self, context_weight: f32) -> Self {
        self.context_weight = context_weight;
        self
    }
}

/// The best candidate of one evaluation and how it scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub candidate: Candidate,
    /// Query ↔ candidate similarity.
    pub candidate_score: f32,
    /// Query ↔ context window similarity.
    pub context_score: f32,
    /// Blended score compared against `threshold`.
    pub score: f32,
    pub threshold: f32,
    pub accepted: bool,
}

impl MatchResult {
    /// `"<start> - <end>"` in character offsets.
    pub fn position(&self) -> String {
        self.candidate.position()
    }

    pub fn matched_text(&self) -> &str {
        &self.candidate.text
    }

    pub fn start(&self) -> usize {
        self.candidate.start
    }

    pub fn end(&self) -> usize {
        self.candidate.end
    }
}

/// Why an evaluation stopped before any embedding work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Empty document or empty query.
    InvalidInput,
    /// The document contains no word characters.
    NoCandidates,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::InvalidInput => "INVALID_INPUT",
            RejectReason::NoCandidates => "NO_CANDIDATES",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`MatchEngine::find_match`](super::MatchEngine::find_match).
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// Blended score reached the threshold.
    Accepted(MatchResult),
    /// A best candidate exists but scored below the threshold.
    BelowThreshold(MatchResult),
    /// Rejected up front; the embedder was not called.
    Rejected(RejectReason),
}

impl MatchOutcome {
    /// Returns `true` for [`MatchOutcome::Accepted`].
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Accepted(_))
    }

    /// The accepted result, if any.
    pub fn accepted(&self) -> Option<&MatchResult> {
        match self {
            MatchOutcome::Accepted(result) => Some(result),
            _ => None,
        }
    }

    /// The scored best candidate, accepted or not.
    pub fn result(&self) -> Option<&MatchResult> {
        match self {
            MatchOutcome::Accepted(result) | MatchOutcome::BelowThreshold(result) => Some(result),
            MatchOutcome::Rejected(_) => None,
        }
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            MatchOutcome::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Blended score, when a candidate was scored.
    pub fn score(&self) -> Option<f32> {
        self.result().map(|r| r.score)
    }

    /// Short label for logs.
    pub fn status(&self) -> &'static str {
        match self {
            MatchOutcome::Accepted(_) => "ACCEPTED",
            MatchOutcome::BelowThreshold(_) => "BELOW_THRESHOLD",
            MatchOutcome::Rejected(reason) => reason.as_str(),
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::Accepted(r) => write!(
                f,
                "ACCEPTED '{}' ({}, score: {:.4})",
                r.matched_text(),
                r.position(),
                r.score
            ),
            MatchOutcome::BelowThreshold(r) => write!(
                f,
                "BELOW_THRESHOLD '{}' (score: {:.4} < {})",
                r.matched_text(),
                r.score,
                r.threshold
            ),
            MatchOutcome::Rejected(reason) => write!(f, "{}", reason),
        }
    }
}
