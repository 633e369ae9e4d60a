use crate::embedding::{Embedder, EmbeddingError};
use crate::scoring::{best_index, blend_scores, cosine_similarity};
use crate::text::{char_window, generate_candidates, tokenize};

use super::error::MatchError;
use super::types::{MatchOutcome, MatchParams, MatchResult, RejectReason};

/// Finds the phrase in a document that best matches a query.
///
/// Stateless apart from the embedder and the refinement parameters, so one engine can
/// serve concurrent callers when `E` is shareable.
#[derive(Debug)]
pub struct MatchEngine<E> {
    embedder: E,
    params: MatchParams,
}

impl<E: Embedder> MatchEngine<E> {
    pub fn new(embedder: E) -> Self {
        Self::with_params(embedder, MatchParams::default())
    }

    pub fn with_params(embedder: E, params: MatchParams) -> Self {
        Self { embedder, params }
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Evaluates `query` against `document` with the engine's parameters.
    pub fn find_match(
        &self,
        document: &str,
        query: &str,
        threshold: f32,
    ) -> Result<MatchOutcome, MatchError> {
        self.find_match_with(document, query, threshold, &self.params)
    }

    /// Evaluates `query` against `document` with explicit parameters.
    ///
    /// Empty input and documents without word characters are rejected before the
    /// embedder is touched (not even loaded). Otherwise the embedder sees exactly three
    /// round trips: the query, one batch with every candidate, and the context window.
    pub fn find_match_with(
        &self,
        document: &str,
        query: &str,
        threshold: f32,
        params: &MatchParams,
    ) -> Result<MatchOutcome, MatchError> {
        if document.is_empty() || query.is_empty() {
            return Ok(MatchOutcome::Rejected(RejectReason::InvalidInput));
        }

        let mut candidates = generate_candidates(&tokenize(document));
        if candidates.is_empty() {
            return Ok(MatchOutcome::Rejected(RejectReason::NoCandidates));
        }

        self.embedder.load()?;

        let query_vec = self.embedder.encode(query)?;

        let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        let candidate_vecs = self.embedder.encode_batch(&texts)?;
        if candidate_vecs.len() != candidates.len() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: candidates.len(),
                actual: candidate_vecs.len(),
            }
            .into());
        }

        let scores: Vec<f32> = candidate_vecs
            .iter()
            .map(|v| cosine_similarity(&query_vec, v))
            .collect();

        let Some((best, candidate_score)) = best_index(&scores) else {
            return Ok(MatchOutcome::Rejected(RejectReason::NoCandidates));
        };
        // `best < candidates.len()` since the batch length was checked above.
        let candidate = candidates.swap_remove(best);

        let context = char_window(
            document,
            candidate.start,
            candidate.end,
            params.context_chars,
        );
        let context_score = cosine_similarity(&query_vec, &self.embedder.encode(context)?);

        let score = blend_scores(candidate_score, context_score, params.context_weight);
        let accepted = score >= threshold;

        let result = MatchResult {
            candidate,
            candidate_score,
            context_score,
            score,
            threshold,
            accepted,
        };

        Ok(if accepted {
            MatchOutcome::Accepted(result)
        } else {
            MatchOutcome::BelowThreshold(result)
        })
    }
}
