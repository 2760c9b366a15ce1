//! Explainable comparison output
//!
//! [`SimilarityResult`] carries the top-level scores together with every
//! sub-report that explains them.

use crate::handwriting::FeatureScores;
use crate::semantic::ConsistencyAnalysis;
use docsim_core::{AnomalyEntry, PageCharacteristics, PageVariation};
use serde::{Deserialize, Serialize};

/// A value reported separately for each compared document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerDocument<T> {
    pub document1: T,
    pub document2: T,
}

impl<T> PerDocument<T> {
    pub fn new(document1: T, document2: T) -> Self {
        Self { document1, document2 }
    }
}

/// Complete result of one document comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Semantic similarity of the two texts
    pub text_similarity: f64,
    /// Weighted handwriting feature similarity
    pub handwriting_similarity: f64,
    /// Composite of the two scores above
    pub similarity_index: f64,
    /// Weight given to the text score in the composite
    pub weight_text: f64,
    /// Per-metric handwriting similarities
    pub feature_scores: FeatureScores,
    pub anomalies: PerDocument<Vec<AnomalyEntry>>,
    pub variations: PerDocument<Vec<PageVariation>>,
    pub consistency_analysis: ConsistencyAnalysis,
    /// Mean metrics of each non-empty page
    pub page_characteristics: PerDocument<Vec<PageCharacteristics>>,
}

impl SimilarityResult {
    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary::compute(self)
    }
}

/// Counts and highlights of a comparison, for logs and dashboards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub similarity_index: f64,
    pub anomaly_count: usize,
    pub variation_count: usize,
    pub inconsistency_count: usize,
    /// Handwriting metric with the lowest similarity
    pub weakest_feature: Option<String>,
}

impl ComparisonSummary {
    pub fn compute(result: &SimilarityResult) -> Self {
        Self {
            similarity_index: result.similarity_index,
            anomaly_count: result.anomalies.document1.len() + result.anomalies.document2.len(),
            variation_count: result.variations.document1.len() + result.variations.document2.len(),
            inconsistency_count: result.consistency_analysis.doc1.len()
                + result.consistency_analysis.doc2.len(),
            weakest_feature: result.feature_scores.weakest().map(|(name, _)| name.to_string()),
        }
    }
}
