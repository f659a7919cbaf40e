use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Origin of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Loaded from the curated dataset.
    Curated,
    /// Synthesized at request time and written back.
    Generated,
}

impl Provenance {
    pub fn is_generated(self) -> bool {
        matches!(self, Provenance::Generated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Curated => "curated",
            Provenance::Generated => "generated",
        }
    }
}

/// Persisted unit of knowledge.
///
/// All fields are committed together: an entry is constructed fully populated
/// and inserted as one unit, never patched field by field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Collision-resistant id, assigned at construction.
    pub id: String,
    /// Embedding of `question`. Dimension is fixed index-wide at first insert.
    pub embedding: Vec<f32>,
    /// Text that produced the embedding.
    pub question: String,
    /// Text returned to users.
    pub answer: String,
    /// Delimiter-separated source URIs.
    pub reference: String,
    /// Immutable once set.
    pub provenance: Provenance,
    /// Unix timestamp of entry creation.
    pub created_at: i64,
}

impl CacheEntry {
    fn new(
        embedding: Vec<f32>,
        question: impl Into<String>,
        answer: impl Into<String>,
        reference: impl Into<String>,
        provenance: Provenance,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            embedding,
            question: question.into(),
            answer: answer.into(),
            reference: reference.into(),
            provenance,
            created_at: Utc::now().timestamp(),
        }
    }

    pub fn curated(
        embedding: Vec<f32>,
        question: impl Into<String>,
        answer: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self::new(embedding, question, answer, reference, Provenance::Curated)
    }

    pub fn generated(
        embedding: Vec<f32>,
        question: impl Into<String>,
        answer: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self::new(embedding, question, answer, reference, Provenance::Generated)
    }
}

/// A query match with its cosine distance (`[0, 2]`, 0 = identical direction).
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    pub entry: CacheEntry,
    pub distance: f32,
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}
