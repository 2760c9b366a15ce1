//! Internal anomaly detection
//!
//! Scores every paragraph against the baseline of its own page and flags
//! metrics that deviate beyond the configured threshold. Page summaries of
//! non-empty pages are then handed to the [`PageVariationAnalyzer`].

use crate::config::DeviationMethod;
use crate::variation::PageVariationAnalyzer;
use docsim_core::stats::{mean, mean_absolute_deviation, median, median_absolute_deviation, std_dev};
use docsim_core::{
    AnomalyEntry, DocumentFeatures, HandwritingMetric, MetricDeviation, PageCharacteristics,
    PageFeatures, PageVariation,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// MAD consistency constant for normally distributed data
const MAD_SCALE: f64 = 0.6745;
/// MeanAD consistency constant (sqrt(pi / 2))
const MEAN_AD_SCALE: f64 = 1.253314;

/// Anomalies, variations and page summaries for one document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentReport {
    pub anomalies: Vec<AnomalyEntry>,
    pub variations: Vec<PageVariation>,
    pub page_characteristics: Vec<PageCharacteristics>,
}

/// Location and spread of one metric on one page
#[derive(Debug, Clone, Copy)]
struct Baseline {
    mean: f64,
    center: f64,
    scale: f64,
}

impl Baseline {
    /// `None` when the metric has no spread on this page
    fn from_values(values: &[f64], method: DeviationMethod) -> Option<Self> {
        let mean = mean(values)?;
        let (center, scale) = match method {
            DeviationMethod::StandardScore => (mean, std_dev(values)?),
            DeviationMethod::ModifiedZScore => {
                let median = median(values)?;
                let mad = median_absolute_deviation(values, median)?;
                if mad > 0.0 {
                    (median, mad / MAD_SCALE)
                } else {
                    (median, MEAN_AD_SCALE * mean_absolute_deviation(values, median)?)
                }
            }
        };

        if scale < f64::EPSILON {
            return None;
        }

        Some(Self { mean, center, scale })
    }

    fn deviation(&self, value: f64) -> f64 {
        (value - self.center).abs() / self.scale
    }
}

#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    threshold: f64,
    method: DeviationMethod,
    variation: PageVariationAnalyzer,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(2.0, DeviationMethod::default(), PageVariationAnalyzer::default())
    }
}

impl AnomalyDetector {
    pub fn new(threshold: f64, method: DeviationMethod, variation: PageVariationAnalyzer) -> Self {
        Self { threshold, method, variation }
    }

    pub fn method(&self) -> DeviationMethod {
        self.method
    }

    /// Anomalies in page then paragraph order, and page-to-page variations
    pub fn detect(&self, document: &DocumentFeatures) -> (Vec<AnomalyEntry>, Vec<PageVariation>) {
        let report = self.report(document);
        (report.anomalies, report.variations)
    }

    /// Full per-document report including page summaries
    pub fn report(&self, document: &DocumentFeatures) -> DocumentReport {
        let mut report = DocumentReport::default();

        for (index, page) in document.pages().iter().enumerate() {
            if page.is_empty() {
                continue;
            }
            let page_number = index + 1;
            report.anomalies.extend(self.detect_page(page, page_number));
            if let Some(summary) = page_characteristics(page, page_number) {
                report.page_characteristics.push(summary);
            }
        }

        if report.page_characteristics.len() > 1 {
            report.variations = self.variation.analyze(&report.page_characteristics);
        }

        debug!(
            pages = document.page_count(),
            anomalies = report.anomalies.len(),
            variations = report.variations.len(),
            "anomaly detection complete"
        );
        report
    }

    /// Outlier paragraphs of a single page; `page_number` is 1-based
    pub fn detect_page(&self, page: &PageFeatures, page_number: usize) -> Vec<AnomalyEntry> {
        let baselines: Vec<(HandwritingMetric, Baseline)> = HandwritingMetric::PAGE_METRICS
            .iter()
            .filter_map(|&metric| {
                Baseline::from_values(&page.metric_values(metric), self.method).map(|b| (metric, b))
            })
            .collect();

        page.paragraphs()
            .iter()
            .enumerate()
            .filter_map(|(paragraph_index, record)| {
                let metrics: BTreeMap<HandwritingMetric, MetricDeviation> = baselines
                    .iter()
                    .filter_map(|(metric, baseline)| {
                        let value = record.metric(*metric);
                        let deviation = baseline.deviation(value);
                        (deviation > self.threshold).then_some((
                            *metric,
                            MetricDeviation {
                                value,
                                mean: baseline.mean,
                                center: baseline.center,
                                scale: baseline.scale,
                                deviation,
                            },
                        ))
                    })
                    .collect();

                (!metrics.is_empty()).then_some(AnomalyEntry {
                    page_number,
                    paragraph_index,
                    metrics,
                })
            })
            .collect()
    }
}

/// Mean page metrics, `None` for an empty page
pub fn page_characteristics(page: &PageFeatures, page_number: usize) -> Option<PageCharacteristics> {
    Some(PageCharacteristics {
        page_number,
        confidence: mean(&page.metric_values(HandwritingMetric::Confidence))?,
        symbol_density: mean(&page.metric_values(HandwritingMetric::SymbolDensity))?,
        line_breaks: mean(&page.metric_values(HandwritingMetric::LineBreaks))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsim_core::FeatureRecord;

    fn record(confidence: f64, symbol_density: f64, line_breaks: u32) -> FeatureRecord {
        FeatureRecord::new(confidence, 6, symbol_density, line_breaks, 0.9)
    }

    fn page(records: Vec<FeatureRecord>) -> PageFeatures {
        PageFeatures::new(records)
    }

    fn standard() -> AnomalyDetector {
        AnomalyDetector::new(2.0, DeviationMethod::StandardScore, PageVariationAnalyzer::default())
    }

    #[test]
    fn test_low_confidence_paragraph_flagged() {
        let doc = DocumentFeatures::new(vec![page(vec![
            record(0.9, 0.1, 2),
            record(0.9, 0.1, 2),
            record(0.9, 0.1, 2),
            record(0.1, 0.1, 2),
        ])]);

        let (anomalies, variations) = AnomalyDetector::default().detect(&doc);

        assert_eq!(anomalies.len(), 1);
        let entry = &anomalies[0];
        assert_eq!((entry.page_number, entry.paragraph_index), (1, 3));
        assert_eq!(entry.metrics.len(), 1);

        let deviation = entry.metrics[&HandwritingMetric::Confidence];
        assert_eq!(deviation.value, 0.1);
        assert!((deviation.mean - 0.7).abs() < 1e-9);
        assert!(deviation.deviation > 2.0);
        assert!(variations.is_empty());
    }

    #[test]
    fn test_zero_variance_page_has_no_anomalies() {
        let doc = DocumentFeatures::new(vec![page(vec![record(0.5, 0.2, 3); 6])]);

        assert!(AnomalyDetector::default().detect(&doc).0.is_empty());
        assert!(standard().detect(&doc).0.is_empty());
    }

    #[test]
    fn test_standard_score_on_larger_page() {
        let mut records = vec![record(0.5, 0.1, 2); 9];
        records.push(record(0.0, 0.1, 2));
        let doc = DocumentFeatures::new(vec![page(records)]);

        let (anomalies, _) = standard().detect(&doc);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].paragraph_index, 9);

        // mean 0.45, population std 0.15
        let deviation = anomalies[0].metrics[&HandwritingMetric::Confidence];
        assert!((deviation.mean - 0.45).abs() < 1e-9);
        assert!((deviation.deviation - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_multiple_metrics_aggregate_into_one_entry() {
        let mut records = vec![record(0.9, 0.1, 2); 5];
        records.insert(2, record(0.2, 0.8, 2));
        let doc = DocumentFeatures::new(vec![page(records)]);

        let (anomalies, _) = AnomalyDetector::default().detect(&doc);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].paragraph_index, 2);
        assert!(anomalies[0].is_flagged(HandwritingMetric::Confidence));
        assert!(anomalies[0].is_flagged(HandwritingMetric::SymbolDensity));
        assert!(!anomalies[0].is_flagged(HandwritingMetric::LineBreaks));
    }

    #[test]
    fn test_anomalies_keep_page_order_and_skip_empty_pages() {
        let outlier_page = || {
            let mut records = vec![record(0.9, 0.1, 2); 4];
            records.push(record(0.1, 0.1, 2));
            page(records)
        };
        let doc = DocumentFeatures::new(vec![outlier_page(), PageFeatures::empty(), outlier_page()]);

        let report = AnomalyDetector::default().report(&doc);
        let pages: Vec<usize> = report.anomalies.iter().map(|a| a.page_number).collect();
        assert_eq!(pages, vec![1, 3]);

        let summarized: Vec<usize> = report.page_characteristics.iter().map(|p| p.page_number).collect();
        assert_eq!(summarized, vec![1, 3]);
    }

    #[test]
    fn test_variations_between_pages() {
        let doc = DocumentFeatures::new(vec![
            page(vec![record(0.9, 0.1, 2); 3]),
            page(vec![record(0.6, 0.1, 2); 3]),
        ]);

        let (anomalies, variations) = AnomalyDetector::default().detect(&doc);
        assert!(anomalies.is_empty());
        assert_eq!(variations.len(), 1);
        assert!(variations[0].changes[0].description.contains("30.0%"));
    }

    #[test]
    fn test_reported_baseline_explains_deviation() {
        let mut records = vec![record(0.9, 0.1, 2); 4];
        records.push(record(0.85, 0.1, 2));

        let anomalies = AnomalyDetector::default().detect_page(&page(records), 1);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].paragraph_index, 4);

        let flagged = &anomalies[0].metrics[&HandwritingMetric::Confidence];
        assert!((flagged.mean - 0.89).abs() < 1e-9);
        assert!((flagged.center - 0.9).abs() < 1e-9);
        assert!(((flagged.value - flagged.center).abs() / flagged.scale - flagged.deviation).abs() < 1e-9);
        assert!(flagged.deviation > 2.0);
    }

    #[test]
    fn test_standard_score_centers_on_mean() {
        let mut records = vec![record(0.9, 0.1, 2); 3];
        records.push(record(0.1, 0.1, 2));
        let detector = AnomalyDetector::new(1.5, DeviationMethod::StandardScore, PageVariationAnalyzer::default());

        let anomalies = detector.detect_page(&page(records), 1);
        let flagged = &anomalies[0].metrics[&HandwritingMetric::Confidence];
        assert_eq!(flagged.center, flagged.mean);
        assert!((flagged.deviation - 3f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_empty_document() {
        let (anomalies, variations) = AnomalyDetector::default().detect(&DocumentFeatures::default());
        assert!(anomalies.is_empty());
        assert!(variations.is_empty());
    }

    #[test]
    fn test_page_characteristics() {
        let summary = page_characteristics(&page(vec![record(0.8, 0.2, 1), record(0.6, 0.4, 3)]), 4).unwrap();
        assert_eq!(summary.page_number, 4);
        assert!((summary.confidence - 0.7).abs() < 1e-9);
        assert!((summary.line_breaks - 2.0).abs() < 1e-9);
        assert!(page_characteristics(&PageFeatures::empty(), 1).is_none());
    }
}
