use super::*;
use crate::embedding::mock::{FailingEmbedder, ScriptedEmbedder, ShortBatchEmbedder};
use crate::embedding::{EmbeddingError, SentenceEmbedder};
use crate::text::CandidateKind;

const FOX_DOC: &str = "быстрая лиса прыгает";

fn stub_engine() -> MatchEngine<SentenceEmbedder> {
    MatchEngine::new(SentenceEmbedder::stub().unwrap())
}

fn orthogonal_default() -> ScriptedEmbedder {
    ScriptedEmbedder::new(vec![0.0, 1.0])
}

#[test]
fn test_exact_word_is_found_with_char_offsets() {
    let outcome = stub_engine().find_match(FOX_DOC, "лиса", 0.6).unwrap();

    assert!(outcome.is_match());
    let result = outcome.result().unwrap();
    assert_eq!(result.matched_text(), "лиса");
    assert_eq!(result.start(), 8);
    assert_eq!(result.end(), 12);
    assert_eq!(result.position(), "8 - 12");
    assert!((result.candidate_score - 1.0).abs() < 1e-5);
    assert!(result.score >= 0.6);
}

#[test]
fn test_empty_document_rejected_without_embedder_calls() {
    let embedder = ScriptedEmbedder::new(vec![1.0]);
    let engine = MatchEngine::new(&embedder);

    let outcome = engine.find_match("", "лиса", 0.6).unwrap();

    assert_eq!(outcome, MatchOutcome::Rejected(RejectReason::InvalidInput));
    assert!(!outcome.is_match());
    assert_eq!(embedder.total_calls(), 0);
    assert_eq!(embedder.load_calls(), 0);
}

#[test]
fn test_empty_query_rejected_without_embedder_calls() {
    let embedder = ScriptedEmbedder::new(vec![1.0]);
    let engine = MatchEngine::new(&embedder);

    let outcome = engine.find_match(FOX_DOC, "", 0.0).unwrap();

    assert_eq!(outcome.reject_reason(), Some(RejectReason::InvalidInput));
    assert_eq!(embedder.total_calls(), 0);
}

#[test]
fn test_document_without_words_has_no_candidates() {
    let embedder = ScriptedEmbedder::new(vec![1.0]);
    let engine = MatchEngine::new(&embedder);

    let outcome = engine.find_match("?! ... --", "anything", 0.0).unwrap();

    assert_eq!(outcome.reject_reason(), Some(RejectReason::NoCandidates));
    assert_eq!(outcome.status(), "NO_CANDIDATES");
    assert_eq!(embedder.total_calls(), 0);
    assert_eq!(embedder.load_calls(), 0);
}

#[test]
fn test_below_threshold_keeps_best_candidate() {
    let embedder =
        ScriptedEmbedder::new(vec![0.5, 0.75f32.sqrt()]).with("y", vec![1.0, 0.0]);
    let engine = MatchEngine::new(&embedder);

    let outcome = engine.find_match("x", "y", 0.99999).unwrap();

    let MatchOutcome::BelowThreshold(result) = &outcome else {
        panic!("expected BelowThreshold, got {outcome:?}");
    };
    assert_eq!(result.matched_text(), "x");
    assert!((result.candidate_score - 0.5).abs() < 1e-5);
    assert!((result.score - 0.5).abs() < 1e-5);
    assert!(!result.accepted);
    assert_eq!(result.threshold, 0.99999);
    assert!(outcome.accepted().is_none());
}

#[test]
fn test_embedder_sees_query_batch_then_context() {
    let embedder = ScriptedEmbedder::new(vec![1.0, 0.0]);
    let engine = MatchEngine::new(&embedder);

    engine.find_match(FOX_DOC, "query", 0.0).unwrap();

    assert_eq!(
        embedder.seen_texts(),
        vec![
            "query",
            "быстрая",
            "лиса",
            "прыгает",
            "быстрая лиса",
            "лиса прыгает",
            "быстрая лиса прыгает",
            "быстрая лиса прыг",
        ]
    );
    assert_eq!(embedder.load_calls(), 1);
    assert_eq!(embedder.batch_calls(), 1);
    assert_eq!(embedder.encode_calls(), 2);
}

#[test]
fn test_equal_scores_pick_first_candidate() {
    let embedder = ScriptedEmbedder::new(vec![1.0, 0.0]);
    let engine = MatchEngine::new(&embedder);

    let outcome = engine.find_match(FOX_DOC, "query", 0.0).unwrap();

    let result = outcome.result().unwrap();
    assert_eq!(result.matched_text(), "быстрая");
    assert_eq!(result.candidate.kind, CandidateKind::Unigram);
}

#[test]
fn test_unigram_beats_equally_scored_bigram() {
    let embedder = orthogonal_default()
        .with("q", vec![1.0, 0.0])
        .with("red fox", vec![1.0, 0.0])
        .with("fox", vec![1.0, 0.0]);
    let engine = MatchEngine::new(&embedder);

    let outcome = engine.find_match("the red fox", "q", 0.0).unwrap();

    let result = outcome.result().unwrap();
    assert_eq!(result.matched_text(), "fox");
    assert_eq!(result.candidate.kind, CandidateKind::Unigram);
}

#[test]
fn test_bigram_wins_when_strictly_best() {
    let embedder = orthogonal_default()
        .with("q", vec![1.0, 0.0])
        .with("red fox", vec![1.0, 0.0])
        .with("fox", vec![0.6, 0.8]);
    let engine = MatchEngine::new(&embedder);

    let outcome = engine.find_match("the red fox jumps", "q", 0.0).unwrap();

    let result = outcome.result().unwrap();
    assert_eq!(result.matched_text(), "red fox");
    assert_eq!((result.start(), result.end()), (4, 11));
    assert_eq!(result.candidate.kind, CandidateKind::Bigram);
}

#[test]
fn test_blended_score_equal_to_threshold_is_accepted() {
    // Whole document is the context window and is orthogonal to the query.
    let embedder = orthogonal_default()
        .with("beta", vec![1.0, 0.0])
        .with("q", vec![1.0, 0.0]);
    let engine = MatchEngine::new(&embedder);

    let outcome = engine.find_match("alpha beta gamma", "q", 0.8).unwrap();

    let result = outcome.result().unwrap();
    assert_eq!(result.matched_text(), "beta");
    assert_eq!(result.context_score, 0.0);
    assert_eq!(result.score, 0.8);
    assert!(outcome.is_match());
    assert_eq!(embedder.seen_texts().last().unwrap(), "alpha beta gamma");
}

#[test]
fn test_context_margin_and_weight_are_honored() {
    let embedder = orthogonal_default()
        .with("beta", vec![1.0, 0.0])
        .with("q", vec![1.0, 0.0]);
    let params = MatchParams::default()
        .with_context_chars(2)
        .with_context_weight(0.5);
    let engine = MatchEngine::with_params(&embedder, params);

    let outcome = engine.find_match("alpha beta gamma", "q", 0.9).unwrap();

    assert_eq!(embedder.seen_texts().last().unwrap(), "a beta g");
    let MatchOutcome::BelowThreshold(result) = outcome else {
        panic!("expected BelowThreshold");
    };
    assert!((result.score - 0.5).abs() < 1e-6);
}

#[test]
fn test_zero_margin_context_is_the_candidate() {
    let embedder = orthogonal_default()
        .with("beta", vec![1.0, 0.0])
        .with("q", vec![1.0, 0.0]);
    let engine = MatchEngine::new(&embedder);
    let params = MatchParams::default().with_context_chars(0);

    let outcome = engine
        .find_match_with("alpha beta gamma", "q", 0.99, &params)
        .unwrap();

    assert_eq!(embedder.seen_texts().last().unwrap(), "beta");
    assert!((outcome.score().unwrap() - 1.0).abs() < 1e-6);
    assert!(outcome.is_match());
}

#[test]
fn test_weight_outside_unit_interval_is_not_clamped() {
    let embedder = orthogonal_default()
        .with("beta", vec![1.0, 0.0])
        .with("q", vec![1.0, 0.0]);
    let engine = MatchEngine::with_params(
        &embedder,
        MatchParams::default().with_context_weight(2.0),
    );

    let outcome = engine.find_match("alpha beta gamma", "q", 0.0).unwrap();

    assert!((outcome.score().unwrap() - 2.0).abs() < 1e-6);
}

#[test]
fn test_acceptance_is_monotone_in_threshold() {
    let engine = stub_engine();
    let mut rejected_once = false;

    for step in 0..=20 {
        let threshold = -1.0 + step as f32 * 0.1;
        let accepted = engine
            .find_match(FOX_DOC, "прыжок", threshold)
            .unwrap()
            .is_match();
        if rejected_once {
            assert!(!accepted, "accepted again at threshold {threshold}");
        }
        rejected_once |= !accepted;
    }
    assert!(rejected_once);
}

#[test]
fn test_repeated_evaluation_is_deterministic() {
    let engine = stub_engine();

    let first = engine.find_match(FOX_DOC, "лиса прыгает", 0.5).unwrap();
    let second = engine.find_match(FOX_DOC, "лиса прыгает", 0.5).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_embedder_failure_propagates() {
    let embedder = FailingEmbedder::new();
    let engine = MatchEngine::new(&embedder);

    let err = engine.find_match(FOX_DOC, "лиса", 0.6).unwrap_err();

    assert!(matches!(
        err,
        MatchError::Embedding(EmbeddingError::InferenceFailed { .. })
    ));
    assert_eq!(embedder.calls(), 1);
}

#[test]
fn test_short_batch_is_a_dimension_mismatch() {
    let engine = MatchEngine::new(ShortBatchEmbedder);

    let err = engine.find_match(FOX_DOC, "лиса", 0.6).unwrap_err();

    assert!(matches!(
        err,
        MatchError::Embedding(EmbeddingError::DimensionMismatch {
            expected: 6,
            actual: 5
        })
    ));
}

#[test]
fn test_outcome_display_and_status() {
    let outcome = stub_engine().find_match(FOX_DOC, "лиса", 0.6).unwrap();

    assert_eq!(outcome.status(), "ACCEPTED");
    assert!(outcome.to_string().starts_with("ACCEPTED 'лиса' (8 - 12"));
    assert_eq!(
        MatchOutcome::Rejected(RejectReason::InvalidInput).to_string(),
        "INVALID_INPUT"
    );
}
