//! Load-once wrapper around an expensive embedder.

use std::time::Instant;

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use super::error::EmbeddingError;
use super::sentence::{EncoderConfig, SentenceEmbedder};
use super::Embedder;

type InitFn<E> = Box<dyn Fn() -> Result<E, EmbeddingError> + Send + Sync>;

/// Defers building an embedder until first use.
///
/// Concurrent callers block while the first one loads; everybody observes either no
/// model or the fully constructed one. A failed load leaves the slot empty so the next
/// call tries again.
pub struct LazyEmbedder<E> {
    cell: OnceCell<E>,
    init: InitFn<E>,
    label: String,
}

impl<E: Embedder> LazyEmbedder<E> {
    /// Wraps an init closure. `label` names the model in logs.
    pub fn new<F>(label: impl Into<String>, init: F) -> Self
    where
        F: Fn() -> Result<E, EmbeddingError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            init: Box::new(init),
            label: label.into(),
        }
    }

    /// Wraps an already-built embedder (no deferred load).
    pub fn ready(label: impl Into<String>, embedder: E) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(embedder);
        Self {
            cell,
            init: Box::new(|| {
                Err(EmbeddingError::InvalidConfig {
                    reason: "embedder was provided pre-loaded".to_string(),
                })
            }),
            label: label.into(),
        }
    }

    /// Returns the embedder, loading it on first call.
    pub fn get(&self) -> Result<&E, EmbeddingError> {
        self.cell.get_or_try_init(|| {
            info!(model = %self.label, "Loading embedding model");
            let started = Instant::now();

            let embedder = (self.init)()
                .and_then(|embedder| embedder.load().map(|_| embedder))
                .inspect_err(|e| warn!(model = %self.label, error = %e, "Model load failed"))?;

            info!(
                model = %self.label,
                duration_ms = started.elapsed().as_millis() as u64,
                stub = embedder.is_stub(),
                "Embedding model loaded"
            );
            Ok(embedder)
        })
    }

    /// Returns the embedder only if it has already been loaded.
    pub fn loaded(&self) -> Option<&E> {
        self.cell.get()
    }

    /// Model label used in logs.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl LazyEmbedder<SentenceEmbedder> {
    /// Lazily loads a [`SentenceEmbedder`] from `config`.
    pub fn from_config(config: EncoderConfig) -> Self {
        let label = if config.testing_stub {
            "stub".to_string()
        } else {
            config.model_dir.display().to_string()
        };
        Self::new(label, move || SentenceEmbedder::load(config.clone()))
    }
}

impl<E: Embedder> Embedder for LazyEmbedder<E> {
    fn load(&self) -> Result<(), EmbeddingError> {
        self.get().map(|_| ())
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.get()?.encode(text)
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.get()?.encode_batch(texts)
    }

    fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    fn is_stub(&self) -> bool {
        self.cell.get().is_some_and(Embedder::is_stub)
    }
}

impl<E> std::fmt::Debug for LazyEmbedder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyEmbedder")
            .field("label", &self.label)
            .field("loaded", &self.cell.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::mock::ScriptedEmbedder;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: Arc<AtomicUsize>) -> LazyEmbedder<ScriptedEmbedder> {
        LazyEmbedder::new("scripted", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(ScriptedEmbedder::new(vec![1.0, 0.0]))
        })
    }

    #[test]
    fn test_not_loaded_until_first_use() {
        let inits = Arc::new(AtomicUsize::new(0));
        let lazy = counting(inits.clone());

        assert!(!lazy.is_loaded());
        assert!(lazy.loaded().is_none());
        assert_eq!(inits.load(Ordering::SeqCst), 0);

        lazy.encode("hello").unwrap();
        assert!(lazy.is_loaded());
        assert_eq!(inits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_is_idempotent() {
        let inits = Arc::new(AtomicUsize::new(0));
        let lazy = counting(inits.clone());

        lazy.load().unwrap();
        lazy.load().unwrap();
        lazy.encode_batch(&["a", "b"]).unwrap();

        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert_eq!(lazy.loaded().unwrap().load_calls(), 1);
    }

    #[test]
    fn test_concurrent_first_use_loads_once() {
        let inits = Arc::new(AtomicUsize::new(0));
        let lazy = Arc::new(LazyEmbedder::new("slow", {
            let inits = inits.clone();
            move || {
                inits.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(20));
                Ok(ScriptedEmbedder::new(vec![0.0, 1.0]))
            }
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = lazy.clone();
                std::thread::spawn(move || lazy.encode("x").map(|v| v.len()))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 2);
        }
        assert_eq!(inits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let lazy = LazyEmbedder::new("flaky", {
            let attempts = attempts.clone();
            move || {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(EmbeddingError::ModelLoadFailed {
                        reason: "disk on fire".to_string(),
                    })
                } else {
                    Ok(ScriptedEmbedder::new(vec![1.0]))
                }
            }
        });

        assert!(lazy.load().is_err());
        assert!(!lazy.is_loaded());
        assert!(lazy.load().is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_ready_skips_init() {
        let lazy = LazyEmbedder::ready("prebuilt", ScriptedEmbedder::new(vec![1.0]));
        assert!(lazy.is_loaded());
        assert!(lazy.load().is_ok());
    }

    #[test]
    fn test_from_config_stub() {
        let lazy = LazyEmbedder::from_config(EncoderConfig::stub().with_embedding_dim(8));
        assert_eq!(lazy.label(), "stub");
        assert!(!lazy.is_stub());
        assert_eq!(lazy.encode("a").unwrap().len(), 8);
        assert!(lazy.is_stub());
    }
}
