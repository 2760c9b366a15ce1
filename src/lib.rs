//! # docsim
//!
//! Compares two documents and produces a composite similarity index from
//! semantic text similarity and handwriting feature similarity, together
//! with per-document anomaly, page-variation and consistency diagnostics.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! docsim serve --http-port 8080
//! curl -X POST localhost:8080/compare -H 'content-type: application/json' -d @request.json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use docsim::prelude::*;
//!
//! let engine = ComparisonEngine::new(EngineConfig::default()).unwrap();
//!
//! let page = PageFeatures::new(vec![
//!     FeatureRecord::new(0.92, 12, 0.08, 2, 0.95),
//!     FeatureRecord::new(0.90, 10, 0.09, 1, 0.93),
//! ]);
//! let features = DocumentFeatures::new(vec![page]);
//!
//! let result = engine
//!     .compare_documents(&features, &features, "Signed by the tenant.", "Signed by the tenant.", 0.5)
//!     .unwrap();
//! assert!((result.similarity_index - 1.0).abs() < 1e-6);
//! ```
//!
//! ## Crate Structure
//!
//! - `docsim-core` - data model, vector math, statistics and segmentation
//! - `docsim-provider` - embedding providers and the text-recognition adapter
//! - `docsim-similarity` - analyzers and the comparison engine
//! - `docsim-api` - REST API

// Re-export core types
pub use docsim_core::{
    DocumentFeatures, FeatureRecord, HandwritingMetric, PageFeatures,
    AnomalyEntry, InconsistencyEntry, PageCharacteristics, PageVariation,
    Vector, Error, Result,
};

// Re-export providers
pub use docsim_provider::{document_features, EmbeddingProvider, HashingEmbedder};

// Re-export the engine
pub use docsim_similarity::{
    ComparisonEngine, ComparisonSummary, DeviationMethod, EngineConfig, SimilarityResult,
};

// Re-export API
pub use docsim_api::{CompareRequest, DocumentInput, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DocumentFeatures, FeatureRecord, HandwritingMetric, PageFeatures,
        ComparisonEngine, EngineConfig, SimilarityResult,
        EmbeddingProvider, HashingEmbedder,
        Error, Result,
    };
}
