//! Vector similarity and score arithmetic.
//!
//! Pure numeric helpers for the match engine: cosine similarity, the candidate/context
//! blend, and first-maximum selection.


/// Cosine similarity: `a·b / (|a| |b|)`.
///
/// Returns `0.0` for empty vectors, zero-norm vectors, or vectors of different lengths.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
            (dot + av * bv, na + av * av, nb + bv * bv)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// `weight * candidate + (1 - weight) * context`. Not clamped.
#[inline]
pub fn blend_scores(candidate: f32, context: f32, weight: f32) -> f32 {
    weight * candidate + (1.0 - weight) * context
}

/// Index and value of the first maximum.
///
/// Later equal scores never displace an earlier one. NaN never wins; if every score is
/// NaN the first index is returned. `None` for an empty slice.
pub fn best_index(scores: &[f32]) -> Option<(usize, f32)> {
    let (&first, rest) = scores.split_first()?;
    let mut best = (0, first);

    for (offset, &score) in rest.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if best.1.is_nan() || score > best.1 {
            best = (offset + 1, score);
        }
    }

    Some(best)
}
