//! Handwriting feature comparison
//!
//! Compares two documents by the means of their paragraph metrics. Page
//! boundaries are ignored and paragraph counts may differ between documents.

use crate::config::HandwritingWeights;
use docsim_core::stats::{clamp_unit, mean};
use docsim_core::{DocumentFeatures, HandwritingMetric};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-metric similarity scores, keyed `<metric>_similarity`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureScores(BTreeMap<String, f64>);

impl FeatureScores {
    /// Report key for a metric's similarity score
    pub fn key(metric: HandwritingMetric) -> &'static str {
        match metric {
            HandwritingMetric::Confidence => "confidence_similarity",
            HandwritingMetric::SymbolDensity => "symbol_density_similarity",
            HandwritingMetric::LineBreaks => "line_break_similarity",
            HandwritingMetric::AverageSymbolConfidence => "average_confidence_similarity",
        }
    }

    pub fn get(&self, metric: HandwritingMetric) -> Option<f64> {
        self.0.get(Self::key(metric)).copied()
    }

    fn insert(&mut self, metric: HandwritingMetric, score: f64) {
        self.0.insert(Self::key(metric).to_string(), score);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Metric with the lowest similarity
    pub fn weakest(&self) -> Option<(&str, f64)> {
        self.iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// Weighted mean-based handwriting comparator
#[derive(Debug, Clone, Default)]
pub struct HandwritingComparator {
    weights: HandwritingWeights,
}

impl HandwritingComparator {
    pub fn new(weights: HandwritingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &HandwritingWeights {
        &self.weights
    }

    /// Compare two documents' handwriting features.
    ///
    /// Returns `(0.0, empty scores)` when either document has no paragraph
    /// records. Otherwise each metric scores `clip(1 - |mean1 - mean2|, 0, 1)`
    /// and the weighted sum of those scores is the overall similarity.
    pub fn compare(
        &self,
        features1: &DocumentFeatures,
        features2: &DocumentFeatures,
    ) -> (f64, FeatureScores) {
        let mut feature_scores = FeatureScores::default();

        if features1.is_empty() || features2.is_empty() {
            debug!("handwriting comparison skipped: a document has no feature records");
            return (0.0, feature_scores);
        }

        let mut similarity = 0.0;
        for metric in HandwritingMetric::ALL {
            let (Some(mean1), Some(mean2)) = (metric_mean(features1, metric), metric_mean(features2, metric)) else {
                continue;
            };
            let score = clamp_unit(1.0 - (mean1 - mean2).abs());
            feature_scores.insert(metric, score);
            similarity += self.weights.weight(metric) * score;
        }

        let similarity = clamp_unit(similarity);
        debug!(similarity, "handwriting comparison complete");
        (similarity, feature_scores)
    }
}

fn metric_mean(document: &DocumentFeatures, metric: HandwritingMetric) -> Option<f64> {
    let values: Vec<f64> = document.records().map(|r| r.metric(metric)).collect();
    mean(&values)
}
