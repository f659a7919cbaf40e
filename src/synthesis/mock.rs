//! Mock synthesizer for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{SynthesisError, SynthesisOutput, SynthesisResult, Synthesizer};
use crate::retrieval::ContextFragment;

enum MockBehavior {
    Succeed(SynthesisOutput),
    Unavailable,
    Malformed,
}

/// Scripted synthesizer recording every call's query and fragment set.
pub struct MockSynthesizer {
    behavior: MockBehavior,
    /// Artificial latency before replying; widens race windows in
    /// concurrency tests.
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: parking_lot::Mutex<Vec<(String, Vec<ContextFragment>)>>,
}

impl MockSynthesizer {
    pub fn with_output(answer: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Succeed(SynthesisOutput {
                answer: answer.into(),
                reference: reference.into(),
            }),
            delay: None,
            calls: AtomicUsize::new(0),
            seen: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            behavior: MockBehavior::Unavailable,
            delay: None,
            calls: AtomicUsize::new(0),
            seen: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn malformed() -> Self {
        Self {
            behavior: MockBehavior::Malformed,
            delay: None,
            calls: AtomicUsize::new(0),
            seen: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `synthesize` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries and fragment lists observed, in call order.
    pub fn seen_calls(&self) -> Vec<(String, Vec<ContextFragment>)> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(
        &self,
        query: &str,
        fragments: &[ContextFragment],
    ) -> SynthesisResult<SynthesisOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .push((query.to_string(), fragments.to_vec()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            MockBehavior::Succeed(output) => Ok(output.clone()),
            MockBehavior::Unavailable => Err(SynthesisError::Unavailable {
                message: "mock failure".to_string(),
            }),
            MockBehavior::Malformed => Err(SynthesisError::MalformedOutput {
                message: "mock contract violation".to_string(),
            }),
        }
    }
}
