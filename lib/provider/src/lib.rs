//! # docsim Provider
//!
//! Boundaries to the external collaborators of the comparison engine.
//!
//! - [`embedder`] - the [`EmbeddingProvider`] trait, a deterministic
//!   [`HashingEmbedder`], per-run caching and parallel segment embedding
//! - [`recognition`] - adapter from document-text-detection responses to
//!   [`docsim_core::PageFeatures`]
//!
//! ## Example
//!
//! ```rust
//! use docsim_core::segment_text;
//! use docsim_provider::{embed_segments, CachedEmbedder, HashingEmbedder};
//!
//! let embedder = CachedEmbedder::new(HashingEmbedder::new(128));
//! let embedded = embed_segments(&embedder, segment_text("first line\nsecond line"));
//! assert_eq!(embedded.len(), 2);
//! ```

pub mod embedder;
pub mod recognition;

pub use embedder::{
    embed_segments, hash_text_to_vector, CachedEmbedder, EmbeddingError, EmbeddingProvider,
    EmbeddingResult, HashingEmbedder, DEFAULT_EMBEDDING_DIM,
};
pub use recognition::{document_features, parse_page, AnnotateImageResponse, RecognitionError};
