use std::sync::Arc;

use crate::embedding::Embedder;
use crate::service::MatchService;

/// Shared handler state.
pub struct HandlerState<E> {
    pub service: Arc<MatchService<E>>,

    /// Threshold applied when a request omits one.
    pub default_threshold: f32,
}

impl<E: Embedder + 'static> HandlerState<E> {
    pub fn new(service: Arc<MatchService<E>>, default_threshold: f32) -> Self {
        Self {
            service,
            default_threshold,
        }
    }
}

impl<E> Clone for HandlerState<E> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            default_threshold: self.default_threshold,
        }
    }
}
