use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Failures that abort a single match. "No match" is never an error.
#[derive(Debug, Clone, Error)]
pub enum MatchError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}
