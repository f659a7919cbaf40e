use std::sync::Arc;

use crate::admin::CacheAdmin;
use crate::embedding::EmbeddingClient;
use crate::policy::AnswerEngine;
use crate::synthesis::Synthesizer;

/// Shared handler state. Cloning is cheap; both members sit behind `Arc`.
pub struct AppState<E: EmbeddingClient, S: Synthesizer> {
    pub engine: Arc<AnswerEngine<E, S>>,
    pub admin: Arc<CacheAdmin>,
}

impl<E: EmbeddingClient, S: Synthesizer> AppState<E, S> {
    pub fn new(engine: Arc<AnswerEngine<E, S>>, admin: Arc<CacheAdmin>) -> Self {
        Self { engine, admin }
    }
}

impl<E: EmbeddingClient, S: Synthesizer> Clone for AppState<E, S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            admin: Arc::clone(&self.admin),
        }
    }
}
