//! Mock embedding client for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{EmbeddingClient, EmbeddingError, EmbeddingResult};

/// Deterministic in-memory embedder. Texts registered with [`register`]
/// return their canned vector; everything else gets a hash-derived vector of
/// `dimension` components, so distinct unknown texts land far apart.
///
/// [`register`]: MockEmbeddingClient::register
#[derive(Debug)]
pub struct MockEmbeddingClient {
    vectors: parking_lot::Mutex<HashMap<String, Vec<f32>>>,
    dimension: usize,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl MockEmbeddingClient {
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: parking_lot::Mutex::new(HashMap::new()),
            dimension,
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    /// Registers a canned vector for `text` (exact match).
    pub fn register(&self, text: impl Into<String>, vector: Vec<f32>) {
        self.vectors.lock().insert(text.into(), vector);
    }

    /// Number of `embed` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `embed` call fail as unavailable.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn derive_vector(&self, text: &str) -> Vec<f32> {
        let hash = blake3::hash(text.as_bytes());
        let bytes = hash.as_bytes();
        (0..self.dimension)
            .map(|i| (f32::from(bytes[i % bytes.len()]) - 127.5) / 127.5)
            .collect()
    }
}

#[async_trait]
impl EmbeddingClient for MockEmbeddingClient {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::Unavailable {
                message: "mock failure".to_string(),
            });
        }

        let canned = self.vectors.lock().get(text).cloned();
        Ok(canned.unwrap_or_else(|| self.derive_vector(text)))
    }
}
