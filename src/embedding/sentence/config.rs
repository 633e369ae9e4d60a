use std::path::PathBuf;

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN};
use crate::embedding::error::EmbeddingError;

/// Files a sentence-encoder model directory must contain.
pub const MODEL_FILES: [&str; 3] = ["config.json", "model.safetensors", "tokenizer.json"];

#[derive(Debug, Clone, PartialEq)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct EncoderConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Max tokens per text; longer inputs are truncated.
    pub max_seq_len: usize,
    /// Output dimension in stub mode (a real model reports its own hidden size).
    pub embedding_dim: usize,
    /// If true, produce deterministic hash-seeded vectors instead of running a model.
    pub testing_stub: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            testing_stub: false,
        }
    }
}

impl EncoderConfig {
    /// Env var used to locate the model directory.
    pub const ENV_MODEL_PATH: &'static str = "SEMFIND_MODEL_PATH";
    /// Env var overriding the max sequence length.
    pub const ENV_MAX_SEQ_LEN: &'static str = "SEMFIND_MAX_SEQ_LEN";

    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Reads `SEMFIND_MODEL_PATH` / `SEMFIND_MAX_SEQ_LEN`. Without a model path the
    /// config falls back to stub mode.
    pub fn from_env() -> Self {
        let model_dir = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let max_seq_len = Self::max_seq_len_from_env();

        match model_dir {
            Some(dir) => Self {
                model_dir: dir,
                max_seq_len,
                ..Default::default()
            },
            None => Self {
                max_seq_len,
                ..Self::stub()
            },
        }
    }

    /// `SEMFIND_MAX_SEQ_LEN`, or the default when unset or unparsable.
    pub fn max_seq_len_from_env() -> usize {
        std::env::var(Self::ENV_MAX_SEQ_LEN)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_SEQ_LEN)
    }

    /// Sets the max sequence length.
    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Sets the stub output dimension.
    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    /// Checks limits and, outside stub mode, that every model file is present.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        if self.testing_stub {
            if self.embedding_dim == 0 {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "embedding_dim must be greater than zero".to_string(),
                });
            }
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        if let Some(missing) = self.missing_files().into_iter().next() {
            return Err(EmbeddingError::ModelNotFound { path: missing });
        }

        Ok(())
    }

    /// Lists required model files that do not exist.
    pub fn missing_files(&self) -> Vec<PathBuf> {
        MODEL_FILES
            .iter()
            .map(|name| self.model_dir.join(name))
            .filter(|path| !path.is_file())
            .collect()
    }
}
