use std::path::PathBuf;
use thiserror::Error;

/// Failures of the sentence encoder.
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    /// A required model file (`config.json`, `model.safetensors`, `tokenizer.json`) or
    /// the model directory itself is missing.
    #[error("sentence encoder file missing: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("could not load sentence encoder: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("sentence encoding failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenizer error: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid encoder configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A batch came back with a different number of vectors than texts sent.
    #[error("encoder returned {actual} vectors for {expected} texts")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
