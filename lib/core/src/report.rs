//! Per-document report entries: anomalies, page variations and semantic
//! inconsistencies.

use crate::features::HandwritingMetric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How far one metric of a paragraph sits from its page baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDeviation {
    pub value: f64,
    /// Page arithmetic mean of the metric
    pub mean: f64,
    /// Location the deviation is measured from: the mean for a standard
    /// score, the median for a modified z-score
    pub center: f64,
    /// Spread the distance is divided by: the standard deviation, or the
    /// MAD-derived robust scale
    pub scale: f64,
    /// `|value - center| / scale`, the score that exceeded the anomaly threshold
    pub deviation: f64,
}

/// An outlier paragraph, with every metric that triggered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEntry {
    /// 1-based page number
    pub page_number: usize,
    /// 0-based paragraph index within the page
    pub paragraph_index: usize,
    pub metrics: BTreeMap<HandwritingMetric, MetricDeviation>,
}

impl AnomalyEntry {
    pub fn is_flagged(&self, metric: HandwritingMetric) -> bool {
        self.metrics.contains_key(&metric)
    }
}

/// Mean page metrics used for page-to-page comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageCharacteristics {
    /// 1-based page number
    pub page_number: usize,
    pub confidence: f64,
    pub symbol_density: f64,
    pub line_breaks: f64,
}

impl PageCharacteristics {
    pub fn metric(&self, metric: HandwritingMetric) -> Option<f64> {
        match metric {
            HandwritingMetric::Confidence => Some(self.confidence),
            HandwritingMetric::SymbolDensity => Some(self.symbol_density),
            HandwritingMetric::LineBreaks => Some(self.line_breaks),
            HandwritingMetric::AverageSymbolConfidence => None,
        }
    }
}

/// One metric whose page mean moved past the variation threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationChange {
    #[serde(rename = "type")]
    pub metric: HandwritingMetric,
    pub difference: f64,
    pub description: String,
}

/// Significant drift between two consecutive non-empty pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageVariation {
    pub from_page: usize,
    pub to_page: usize,
    pub changes: Vec<VariationChange>,
}

/// An abrupt semantic break between two adjacent segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InconsistencyEntry {
    pub segment_index: usize,
    pub segment_text: String,
    pub next_segment_text: String,
    pub similarity_score: f64,
    pub line_number: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomaly_entry_serialization() {
        let mut metrics = BTreeMap::new();
        metrics.insert(
            HandwritingMetric::Confidence,
            MetricDeviation { value: 0.1, mean: 0.7, center: 0.9, scale: 0.25, deviation: 3.2 },
        );
        let entry = AnomalyEntry { page_number: 1, paragraph_index: 3, metrics };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["page_number"], 1);
        assert_eq!(json["paragraph_index"], 3);
        assert_eq!(json["metrics"]["confidence"]["value"], 0.1);
        assert_eq!(json["metrics"]["confidence"]["center"], 0.9);
        assert!(entry.is_flagged(HandwritingMetric::Confidence));
        assert!(!entry.is_flagged(HandwritingMetric::LineBreaks));
    }

    #[test]
    fn test_variation_change_uses_type_key() {
        let change = VariationChange {
            metric: HandwritingMetric::LineBreaks,
            difference: 0.5,
            description: "Line spacing changed by 50.0%".to_string(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "line_breaks");
    }

    #[test]
    fn test_page_characteristics_metric() {
        let page = PageCharacteristics {
            page_number: 2,
            confidence: 0.8,
            symbol_density: 0.2,
            line_breaks: 3.0,
        };
        assert_eq!(page.metric(HandwritingMetric::LineBreaks), Some(3.0));
        assert_eq!(page.metric(HandwritingMetric::AverageSymbolConfidence), None);
    }
}
