//! Sentence embedder (BERT + mean pooling, or a deterministic stub).
//!
//! Use [`EncoderConfig::stub`] for tests/examples without model files.

/// Sentence encoder configuration.
pub mod config;


pub use config::{EncoderConfig, MODEL_FILES};

use std::sync::Arc;

use candle_core::{Device, Tensor};
use tracing::{debug, info, warn};

use crate::embedding::Embedder;
use crate::embedding::bert::BertEncoder;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::load_tokenizer_with_truncation;

enum EncoderBackend {
    Model {
        model: BertEncoder,
        tokenizer: Arc<tokenizers::Tokenizer>,
        device: Device,
    },
    Stub,
}

/// Text → L2-normalised vector.
pub struct SentenceEmbedder {
    backend: EncoderBackend,
    config: EncoderConfig,
    embedding_dim: usize,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the encoder described by `config` (stub mode never touches the filesystem).
    pub fn load(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Sentence embedder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                embedding_dim: config.embedding_dim,
                config,
            });
        }

        let device = select_device();
        debug!(?device, "Selected compute device for sentence encoder");

        let tokenizer = load_tokenizer_with_truncation(&config.model_dir, config.max_seq_len)
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        let model = BertEncoder::load(&config.model_dir, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            }
        })?;

        let embedding_dim = model.hidden_size();

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim,
            max_seq_len = config.max_seq_len,
            "Sentence encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer: Arc::new(tokenizer),
                device,
            },
            embedding_dim,
            config,
        })
    }

    /// Shorthand for `load(EncoderConfig::stub())`.
    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(EncoderConfig::stub())
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &BertEncoder,
        tokenizer: &tokenizers::Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        if encoding.get_ids().is_empty() {
            return Ok(vec![0.0; self.embedding_dim]);
        }

        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Encoding text"
        );

        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let pooled = model
            .forward_pooled(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("BERT forward pass failed: {}", e),
            })?
            .squeeze(0)?
            .to_vec1::<f32>()?;

        Ok(normalize(pooled))
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let embedding = (0..self.embedding_dim)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();

        normalize(embedding)
    }

    /// Output vector dimension.
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Returns `true` if a real model is loaded.
    pub fn has_model(&self) -> bool {
        matches!(self.backend, EncoderBackend::Model { .. })
    }

    /// Returns the encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

impl Embedder for SentenceEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.embed_with_model(text, model, tokenizer, device),
            EncoderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        // One forward pass per text; batching would need padding.
        texts.iter().map(|text| self.encode(text)).collect()
    }

    fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }
}

fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
