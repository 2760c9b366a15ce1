//! # docsim Similarity
//!
//! The similarity and anomaly analysis engine behind docsim.
//!
//! Given pre-extracted handwriting features and the text of two documents,
//! the engine produces an explainable verdict: a composite similarity index,
//! per-metric handwriting scores, outlier paragraphs, page-to-page drift and
//! line-to-line semantic breaks.
//!
//! ## Components
//!
//! - [`HandwritingComparator`] - weighted comparison of per-document metric means
//! - [`AnomalyDetector`] - per-page outlier paragraphs
//! - [`PageVariationAnalyzer`] - significant drift between consecutive pages
//! - [`SemanticAnalyzer`] - embedding-based similarity and internal consistency
//! - [`composite::aggregate`] - weighted blend of text and handwriting scores
//!
//! ## Example
//!
//! ```rust
//! use docsim_core::{DocumentFeatures, FeatureRecord, PageFeatures};
//! use docsim_similarity::{ComparisonEngine, EngineConfig};
//!
//! let page = PageFeatures::new(vec![FeatureRecord::new(0.9, 8, 0.1, 2, 0.9); 3]);
//! let features = DocumentFeatures::new(vec![page]);
//!
//! let engine = ComparisonEngine::new(EngineConfig::default()).unwrap();
//! let result = engine
//!     .compare_documents(&features, &features, "Hello there\nSee you soon", "Hello there", 0.5)
//!     .unwrap();
//! assert!(result.similarity_index > 0.5);
//! ```
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐
//! │  features   │────>│ Handwriting  │──────────────┐
//! │  (doc 1, 2) │     │  Comparator  │              │
//! └─────────────┘     └──────────────┘              v
//!       │             ┌──────────────┐       ┌─────────────┐
//!       └────────────>│   Anomaly    │       │  Composite  │
//!                     │ + Variation  │       │  Aggregator │
//!                     └──────────────┘       └─────────────┘
//! ┌─────────────┐     ┌──────────────┐              ^
//! │    text     │────>│   Semantic   │──────────────┘
//! │  (doc 1, 2) │     │   Analyzer   │
//! └─────────────┘     └──────────────┘
//! ```

pub mod anomaly;
pub mod composite;
pub mod config;
pub mod engine;
pub mod handwriting;
pub mod result;
pub mod semantic;
pub mod variation;

pub use anomaly::{page_characteristics, AnomalyDetector, DocumentReport};
pub use composite::{aggregate, validate_weight};
pub use config::{ConfigError, DeviationMethod, EngineConfig, HandwritingWeights};
pub use engine::ComparisonEngine;
pub use handwriting::{FeatureScores, HandwritingComparator};
pub use result::{ComparisonSummary, PerDocument, SimilarityResult};
pub use semantic::{ConsistencyAnalysis, SemanticAnalysis, SemanticAnalyzer};
pub use variation::PageVariationAnalyzer;
