//! # docsim Core
//!
//! Core data structures for the docsim document comparison engine.
//!
//! - [`FeatureRecord`], [`PageFeatures`], [`DocumentFeatures`] - handwriting recognition metadata per paragraph
//! - [`AnomalyEntry`], [`PageVariation`], [`InconsistencyEntry`] - explainable report entries
//! - [`Vector`], [`SegmentEmbeddings`] - segment embeddings and cosine similarity
//! - [`stats`] - descriptive statistics used by the analyzers
//!
//! ## Example
//!
//! ```rust
//! use docsim_core::{segment_text, DocumentFeatures, FeatureRecord, PageFeatures};
//!
//! let page = PageFeatures::new(vec![
//!     FeatureRecord::new(0.92, 12, 0.08, 3, 0.95),
//!     FeatureRecord::new(0.88, 9, 0.11, 2, 0.91),
//! ]);
//! let document = DocumentFeatures::new(vec![page]);
//! assert_eq!(document.record_count(), 2);
//!
//! let segments = segment_text("Dear Sir,\n\n  I write regarding ...  \n");
//! assert_eq!(segments.len(), 2);
//! ```

pub mod error;
pub mod features;
pub mod report;
pub mod segment;
pub mod stats;
pub mod vector;

pub use error::{Error, Result};
pub use features::{DocumentFeatures, FeatureRecord, HandwritingMetric, PageFeatures};
pub use report::{
    AnomalyEntry, InconsistencyEntry, MetricDeviation, PageCharacteristics, PageVariation,
    VariationChange,
};
pub use segment::{segment_text, SegmentEmbeddings, SemanticSegment};
pub use vector::Vector;
