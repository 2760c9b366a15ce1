//! Page-to-page variation analysis
//!
//! Flags consecutive page pairs whose mean metrics drift by more than a
//! fixed threshold, which can indicate a change of writer or scan quality
//! within one document.

use docsim_core::{HandwritingMetric, PageCharacteristics, PageVariation, VariationChange};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PageVariationAnalyzer {
    threshold: f64,
}

impl Default for PageVariationAnalyzer {
    fn default() -> Self {
        Self::new(0.15)
    }
}

impl PageVariationAnalyzer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compare each page summary with its predecessor.
    ///
    /// Only pairs with at least one metric change above the threshold are
    /// returned; fewer than two summaries yield no variations.
    pub fn analyze(&self, pages: &[PageCharacteristics]) -> Vec<PageVariation> {
        let variations: Vec<PageVariation> = pages
            .windows(2)
            .filter_map(|pair| self.compare_pair(&pair[0], &pair[1]))
            .collect();

        debug!(pages = pages.len(), variations = variations.len(), "page variation analysis complete");
        variations
    }

    fn compare_pair(&self, prev: &PageCharacteristics, curr: &PageCharacteristics) -> Option<PageVariation> {
        let changes: Vec<VariationChange> = HandwritingMetric::PAGE_METRICS
            .iter()
            .filter_map(|&metric| {
                let difference = (curr.metric(metric)? - prev.metric(metric)?).abs();
                (difference > self.threshold).then(|| VariationChange {
                    metric,
                    difference,
                    description: format!("{} changed by {:.1}%", metric.label(), difference * 100.0),
                })
            })
            .collect();

        if changes.is_empty() {
            return None;
        }

        Some(PageVariation {
            from_page: prev.page_number,
            to_page: curr.page_number,
            changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page_number: usize, confidence: f64, symbol_density: f64, line_breaks: f64) -> PageCharacteristics {
        PageCharacteristics { page_number, confidence, symbol_density, line_breaks }
    }

    #[test]
    fn test_confidence_drop_reported() {
        let pages = vec![page(1, 0.90, 0.1, 2.0), page(2, 0.60, 0.1, 2.0)];
        let variations = PageVariationAnalyzer::default().analyze(&pages);

        assert_eq!(variations.len(), 1);
        let variation = &variations[0];
        assert_eq!((variation.from_page, variation.to_page), (1, 2));
        assert_eq!(variation.changes.len(), 1);

        let change = &variation.changes[0];
        assert_eq!(change.metric, HandwritingMetric::Confidence);
        assert!((change.difference - 0.30).abs() < 1e-9);
        assert!(change.description.contains("30.0%"));
        assert_eq!(change.description, "Confidence changed by 30.0%");
    }

    #[test]
    fn test_small_changes_omitted() {
        let pages = vec![page(1, 0.90, 0.10, 2.0), page(2, 0.80, 0.20, 2.1), page(3, 0.85, 0.15, 2.0)];
        assert!(PageVariationAnalyzer::default().analyze(&pages).is_empty());
    }

    #[test]
    fn test_only_significant_pairs_emitted() {
        let pages = vec![
            page(1, 0.9, 0.1, 2.0),
            page(2, 0.9, 0.1, 2.0),
            page(4, 0.9, 0.5, 4.0),
        ];
        let variations = PageVariationAnalyzer::default().analyze(&pages);

        assert_eq!(variations.len(), 1);
        assert_eq!((variations[0].from_page, variations[0].to_page), (2, 4));
        let kinds: Vec<HandwritingMetric> = variations[0].changes.iter().map(|c| c.metric).collect();
        assert_eq!(kinds, vec![HandwritingMetric::SymbolDensity, HandwritingMetric::LineBreaks]);
        assert_eq!(variations[0].changes[1].description, "Line spacing changed by 200.0%");
    }

    #[test]
    fn test_single_page_has_no_variations() {
        assert!(PageVariationAnalyzer::default().analyze(&[page(1, 0.9, 0.1, 2.0)]).is_empty());
        assert!(PageVariationAnalyzer::default().analyze(&[]).is_empty());
    }
}
