//! Test embedders with scripted vectors and call accounting.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::Embedder;
use super::error::EmbeddingError;

/// Returns a fixed vector per text (or a default one) and counts every call.
#[derive(Debug, Default)]
pub struct ScriptedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
    load_calls: AtomicUsize,
    encode_calls: AtomicUsize,
    batch_calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl ScriptedEmbedder {
    /// Every unscripted text maps to `default`.
    pub fn new(default: Vec<f32>) -> Self {
        Self {
            default,
            ..Default::default()
        }
    }

    /// Scripts the vector returned for `text`.
    pub fn with(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    fn lookup(&self, text: &str) -> Vec<f32> {
        self.seen.lock().push(text.to_string());
        self.vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    /// Single-text `encode` calls.
    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    /// `encode_batch` calls (each counts once regardless of size).
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Every embedder round trip, single or batched.
    pub fn total_calls(&self) -> usize {
        self.encode_calls() + self.batch_calls()
    }

    /// Texts encoded so far, in call order (batch members expanded).
    pub fn seen_texts(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

impl Embedder for ScriptedEmbedder {
    fn load(&self) -> Result<(), EmbeddingError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lookup(text))
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.lookup(t)).collect())
    }

    fn is_stub(&self) -> bool {
        true
    }
}

/// Fails every call with [`EmbeddingError::InferenceFailed`].
#[derive(Debug, Default)]
pub struct FailingEmbedder {
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> EmbeddingError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        EmbeddingError::InferenceFailed {
            reason: "model unavailable".to_string(),
        }
    }
}

impl Embedder for FailingEmbedder {
    fn encode(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(self.fail())
    }

    fn encode_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(self.fail())
    }
}

/// Drops the last vector of every batch, to exercise length checks.
#[derive(Debug, Default)]
pub struct ShortBatchEmbedder;

impl Embedder for ShortBatchEmbedder {
    fn encode(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![1.0, 0.0])
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(vec![vec![1.0, 0.0]; texts.len().saturating_sub(1)])
    }
}
