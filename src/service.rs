//! Request-level matching shared by the HTTP and CLI front ends.
//!
//! Adds what a single [`MatchEngine`] call lacks: the empty-query fallback, result
//! memoization, and the human-readable summary returned to clients.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CachePolicy, ResultCache};
use crate::constants::{QUERY_FALLBACK_CHARS, char_prefix};
use crate::embedding::Embedder;
use crate::matching::{MatchEngine, MatchError, MatchOutcome, MatchParams};

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Summary for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub summary: Arc<str>,
    /// Served from the result cache.
    pub cached: bool,
}

/// Formats an outcome as the summary string clients see.
pub fn summarize(outcome: &MatchOutcome, threshold: f32) -> String {
    match outcome.accepted() {
        Some(result) => format!(
            "Processed: found '{}' (position: {}, similarity: {:.4})",
            result.matched_text(),
            result.position(),
            result.score
        ),
        None => format!("Processed: no matches found (threshold: {threshold})"),
    }
}

/// Match engine plus an exact-key summary cache.
#[derive(Debug)]
pub struct MatchService<E> {
    engine: MatchEngine<E>,
    cache: ResultCache<Arc<str>>,
}

impl<E: Embedder> MatchService<E> {
    pub fn new(engine: MatchEngine<E>, policy: CachePolicy) -> Self {
        Self {
            engine,
            cache: ResultCache::new(policy),
        }
    }

    /// Engine with default [`MatchParams`] and an unbounded cache.
    pub fn with_embedder(embedder: E) -> Self {
        Self::new(
            MatchEngine::with_params(embedder, MatchParams::default()),
            CachePolicy::Unbounded,
        )
    }

    pub fn engine(&self) -> &MatchEngine<E> {
        &self.engine
    }

    pub fn cache(&self) -> &ResultCache<Arc<str>> {
        &self.cache
    }

    /// Matches `query` in `text` and returns the summary, memoized per
    /// `(text, resolved query, threshold)`.
    ///
    /// An empty `query` falls back to the first 100 characters of `text`.
    pub fn predict(
        &self,
        text: &str,
        query: &str,
        threshold: f32,
    ) -> Result<Prediction, ServiceError> {
        if text.is_empty() {
            warn!("Rejected request without text");
            return Err(ServiceError::InvalidInput("no text provided".to_string()));
        }

        let query = if query.is_empty() {
            char_prefix(text, QUERY_FALLBACK_CHARS)
        } else {
            query
        };

        let lookup = self.cache.get_or_compute(text, query, threshold, || {
            let outcome = self.engine.find_match(text, query, threshold)?;
            info!(
                status = outcome.status(),
                matched = outcome.accepted().map(|r| r.matched_text()),
                score = outcome.score(),
                threshold,
                "Match evaluated"
            );
            Ok::<_, ServiceError>(Arc::from(summarize(&outcome, threshold)))
        })?;

        if lookup.hit {
            debug!(text_chars = text.chars().count(), threshold, "Result cache hit");
        }

        Ok(Prediction {
            summary: lookup.value,
            cached: lookup.hit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::mock::{FailingEmbedder, ScriptedEmbedder};
    use crate::embedding::{EmbeddingError, SentenceEmbedder};

    fn fox_embedder() -> ScriptedEmbedder {
        ScriptedEmbedder::new(vec![0.0, 1.0])
            .with("fox", vec![1.0, 0.0])
            .with("лиса", vec![1.0, 0.0])
    }

    #[test]
    fn test_found_summary() {
        let service = MatchService::with_embedder(fox_embedder());

        let prediction = service.predict("the red fox", "fox", 0.5).unwrap();

        assert_eq!(
            &*prediction.summary,
            "Processed: found 'fox' (position: 8 - 11, similarity: 0.8000)"
        );
        assert!(!prediction.cached);
    }

    #[test]
    fn test_no_match_summary() {
        let service = MatchService::with_embedder(fox_embedder());

        let prediction = service.predict("the red fox", "fox", 0.95).unwrap();

        assert_eq!(
            &*prediction.summary,
            "Processed: no matches found (threshold: 0.95)"
        );
    }

    #[test]
    fn test_repeat_request_is_cached_and_identical() {
        let service = MatchService::with_embedder(fox_embedder());

        let first = service.predict("the red fox", "fox", 0.5).unwrap();
        let calls_after_first = service.engine().embedder().total_calls();
        let second = service.predict("the red fox", "fox", 0.5).unwrap();

        assert_eq!(first.summary, second.summary);
        assert!(second.cached);
        assert_eq!(service.engine().embedder().total_calls(), calls_after_first);
    }

    #[test]
    fn test_empty_text_is_invalid_input() {
        let service = MatchService::with_embedder(fox_embedder());

        let err = service.predict("", "fox", 0.5).unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m == "no text provided"));
        assert_eq!(service.engine().embedder().total_calls(), 0);
    }

    #[test]
    fn test_empty_query_falls_back_to_text_prefix() {
        let service = MatchService::with_embedder(fox_embedder());
        let text = "лиса ".repeat(40);

        service.predict(&text, "", 0.5).unwrap();

        let seen = service.engine().embedder().seen_texts();
        assert_eq!(seen[0].chars().count(), QUERY_FALLBACK_CHARS);
        assert!(text.starts_with(&seen[0]));
    }

    #[test]
    fn test_stub_embedder_finds_exact_word() {
        let service = MatchService::with_embedder(SentenceEmbedder::stub().unwrap());

        let prediction = service
            .predict("быстрая лиса прыгает", "лиса", 0.6)
            .unwrap();

        assert!(
            prediction
                .summary
                .starts_with("Processed: found 'лиса' (position: 8 - 12, similarity: ")
        );
    }

    #[test]
    fn test_engine_failure_is_not_cached() {
        let service = MatchService::with_embedder(FailingEmbedder::new());

        let err = service.predict("the red fox", "fox", 0.5).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Match(MatchError::Embedding(EmbeddingError::InferenceFailed { .. }))
        ));

        service.predict("the red fox", "fox", 0.5).unwrap_err();
        assert_eq!(service.engine().embedder().calls(), 2);
        assert!(!service.cache().contains("the red fox", "fox", 0.5));
    }
}
