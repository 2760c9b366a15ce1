//! Embedding providers
//!
//! The engine only consumes vectors; producing them is delegated to an
//! [`EmbeddingProvider`]. [`HashingEmbedder`] is a deterministic, model-free
//! provider based on feature hashing of character trigrams and words, and
//! [`CachedEmbedder`] memoises any provider for the duration of one
//! comparison run so identical segments always receive identical vectors.

use ahash::AHashMap;
use docsim_core::{SemanticSegment, Vector};
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Default dimension for hashed embeddings
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Errors raised by an embedding provider for a single segment
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    #[error("Invalid input text: {0}")]
    InvalidInput(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider returned an empty embedding")]
    EmptyEmbedding,
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Produces a fixed-dimension vector for a text segment.
///
/// Implementations must be deterministic for identical input within one
/// comparison run.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    fn dimension(&self) -> usize;
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for &T {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        (**self).embed(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<T> {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        (**self).embed(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<T> {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        (**self).embed(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// Feature-hashing embedder over character trigrams and words
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("segment is blank".to_string()));
        }
        Ok(hash_text_to_vector(text, self.dim))
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

/// Hash a string into a unit-length vector.
///
/// Each trigram adds 1.0 and each whitespace-separated word adds 2.0 at the
/// position its hash selects.
pub fn hash_text_to_vector(text: &str, dim: usize) -> Vec<f32> {
    if dim == 0 {
        return Vec::new();
    }

    let mut vector = vec![0.0f32; dim];
    let normalized = text.to_lowercase();

    for trigram in generate_trigrams(&normalized) {
        vector[bucket(&trigram, dim)] += 1.0;
    }

    for word in normalized.split_whitespace() {
        vector[bucket(word, dim)] += 2.0;
    }

    let mut vector = Vector::new(vector);
    vector.normalize();
    vector.as_slice().to_vec()
}

fn bucket(token: &str, dim: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    (hasher.finish() as usize) % dim
}

/// Character trigrams of a space-padded string
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    chars.windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

/// Memoising wrapper; one instance should live for exactly one comparison run
pub struct CachedEmbedder<E> {
    inner: E,
    cache: RwLock<AHashMap<String, Vec<f32>>>,
}

impl<E: EmbeddingProvider> CachedEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: RwLock::new(AHashMap::new()),
        }
    }

    /// Number of distinct segments embedded so far
    pub fn cached_count(&self) -> usize {
        self.cache.read().len()
    }
}

impl<E: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<E> {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if let Some(hit) = self.cache.read().get(text) {
            return Ok(hit.clone());
        }

        let vector = self.inner.embed(text)?;
        // First writer wins so concurrent misses on one segment agree
        let mut cache = self.cache.write();
        Ok(cache.entry(text.to_string()).or_insert(vector).clone())
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

/// Embed segments in parallel, preserving document order.
///
/// A segment whose embedding fails is skipped with a warning; the rest of
/// the document is still embedded.
pub fn embed_segments<P>(provider: &P, segments: Vec<SemanticSegment>) -> Vec<(SemanticSegment, Vector)>
where
    P: EmbeddingProvider + ?Sized,
{
    let total = segments.len();
    let embedded: Vec<(SemanticSegment, Vector)> = segments
        .into_par_iter()
        .map(|segment| {
            let result = provider.embed(&segment.text).and_then(|values| {
                if values.is_empty() {
                    Err(EmbeddingError::EmptyEmbedding)
                } else {
                    Ok(Vector::new(values))
                }
            });
            (segment, result)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .filter_map(|(segment, result)| match result {
            Ok(vector) => Some((segment, vector)),
            Err(e) => {
                warn!(segment = segment.index, error = %e, "skipping segment after embedding failure");
                None
            }
        })
        .collect();

    debug!(total, embedded = embedded.len(), "embedded segments");
    embedded
}
