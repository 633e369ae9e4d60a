//! Embedding capability used by the match engine.
//!
//! - [`Embedder`] is the seam: anything that turns text into fixed-length vectors.
//! - [`sentence`] provides the BERT sentence encoder (or its deterministic stub).
//! - [`lazy`] defers the expensive model load to first use, once.

/// BERT encoder with mean pooling.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Load-once wrapper.
pub mod lazy;
/// Scripted embedders for tests.
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Sentence embedder.
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;

use std::sync::Arc;

pub use error::EmbeddingError;
pub use lazy::LazyEmbedder;
pub use sentence::{EncoderConfig, SentenceEmbedder};

/// Text → vector capability.
///
/// Implementations must be deterministic for a fixed model and return vectors of one
/// fixed dimension.
pub trait Embedder: Send + Sync {
    /// Makes the model ready. Idempotent: only the first successful call does work.
    fn load(&self) -> Result<(), EmbeddingError> {
        Ok(())
    }

    /// Encodes a single text.
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Encodes many texts, preserving order. Empty input yields empty output.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// Returns `true` once the model is ready to encode.
    fn is_loaded(&self) -> bool {
        true
    }

    /// Returns `true` if vectors are synthetic rather than model output.
    fn is_stub(&self) -> bool {
        false
    }
}

impl<E: Embedder + ?Sized> Embedder for Arc<E> {
    fn load(&self) -> Result<(), EmbeddingError> {
        (**self).load()
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).encode(text)
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).encode_batch(texts)
    }

    fn is_loaded(&self) -> bool {
        (**self).is_loaded()
    }

    fn is_stub(&self) -> bool {
        (**self).is_stub()
    }
}

impl<E: Embedder + ?Sized> Embedder for &E {
    fn load(&self) -> Result<(), EmbeddingError> {
        (**self).load()
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).encode(text)
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).encode_batch(texts)
    }

    fn is_loaded(&self) -> bool {
        (**self).is_loaded()
    }

    fn is_stub(&self) -> bool {
        (**self).is_stub()
    }
}
