//! Handwriting feature records
//!
//! One [`FeatureRecord`] per recognized paragraph, grouped into pages
//! ([`PageFeatures`]) and documents ([`DocumentFeatures`]). Order is
//! significant at both levels: paragraph order drives anomaly indices and
//! page order drives page-to-page variation analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognition metadata for a single paragraph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Paragraph recognition confidence (0.0 to 1.0)
    pub confidence: f64,
    /// Number of recognized words
    #[serde(default)]
    pub word_count: u32,
    /// Fraction of non-alphanumeric symbols (0.0 to 1.0)
    pub symbol_density: f64,
    /// Number of symbols carrying a detected break
    pub line_breaks: u32,
    /// Mean symbol confidence, 0.0 when the paragraph has no symbols
    #[serde(default)]
    pub average_symbol_confidence: f64,
}

impl FeatureRecord {
    pub fn new(
        confidence: f64,
        word_count: u32,
        symbol_density: f64,
        line_breaks: u32,
        average_symbol_confidence: f64,
    ) -> Self {
        Self {
            confidence,
            word_count,
            symbol_density,
            line_breaks,
            average_symbol_confidence,
        }
    }

    /// Value of `metric` for this paragraph
    #[inline]
    pub fn metric(&self, metric: HandwritingMetric) -> f64 {
        match metric {
            HandwritingMetric::Confidence => self.confidence,
            HandwritingMetric::SymbolDensity => self.symbol_density,
            HandwritingMetric::LineBreaks => f64::from(self.line_breaks),
            HandwritingMetric::AverageSymbolConfidence => self.average_symbol_confidence,
        }
    }
}

/// The per-paragraph metrics the engine compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandwritingMetric {
    Confidence,
    SymbolDensity,
    LineBreaks,
    AverageSymbolConfidence,
}

impl HandwritingMetric {
    /// All four metrics, in report order
    pub const ALL: [HandwritingMetric; 4] = [
        HandwritingMetric::Confidence,
        HandwritingMetric::SymbolDensity,
        HandwritingMetric::LineBreaks,
        HandwritingMetric::AverageSymbolConfidence,
    ];

    /// Metrics tracked per page for anomalies and variations
    pub const PAGE_METRICS: [HandwritingMetric; 3] = [
        HandwritingMetric::Confidence,
        HandwritingMetric::SymbolDensity,
        HandwritingMetric::LineBreaks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandwritingMetric::Confidence => "confidence",
            HandwritingMetric::SymbolDensity => "symbol_density",
            HandwritingMetric::LineBreaks => "line_breaks",
            HandwritingMetric::AverageSymbolConfidence => "average_symbol_confidence",
        }
    }

    /// Human-readable label used in variation descriptions
    pub fn label(&self) -> &'static str {
        match self {
            HandwritingMetric::Confidence => "Confidence",
            HandwritingMetric::SymbolDensity => "Symbol density",
            HandwritingMetric::LineBreaks => "Line spacing",
            HandwritingMetric::AverageSymbolConfidence => "Average symbol confidence",
        }
    }
}

impl fmt::Display for HandwritingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paragraph features of one page, in paragraph order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageFeatures {
    paragraphs: Vec<FeatureRecord>,
}

impl PageFeatures {
    pub fn new(paragraphs: Vec<FeatureRecord>) -> Self {
        Self { paragraphs }
    }

    /// A page whose recognition produced nothing usable
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn paragraphs(&self) -> &[FeatureRecord] {
        &self.paragraphs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Values of `metric` across the page's paragraphs
    pub fn metric_values(&self, metric: HandwritingMetric) -> Vec<f64> {
        self.paragraphs.iter().map(|p| p.metric(metric)).collect()
    }
}

impl From<Vec<FeatureRecord>> for PageFeatures {
    fn from(paragraphs: Vec<FeatureRecord>) -> Self {
        Self::new(paragraphs)
    }
}

/// Page features of one document, in page order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentFeatures {
    pages: Vec<PageFeatures>,
}

impl DocumentFeatures {
    pub fn new(pages: Vec<PageFeatures>) -> Self {
        Self { pages }
    }

    #[inline]
    pub fn pages(&self) -> &[PageFeatures] {
        &self.pages
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All paragraphs across pages, ignoring page boundaries
    pub fn records(&self) -> impl Iterator<Item = &FeatureRecord> + '_ {
        self.pages.iter().flat_map(|page| page.paragraphs().iter())
    }

    /// Total number of paragraph records
    pub fn record_count(&self) -> usize {
        self.pages.iter().map(PageFeatures::len).sum()
    }

    /// True when no page holds a paragraph
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(PageFeatures::is_empty)
    }
}

impl From<Vec<PageFeatures>> for DocumentFeatures {
    fn from(pages: Vec<PageFeatures>) -> Self {
        Self::new(pages)
    }
}

impl FromIterator<PageFeatures> for DocumentFeatures {
    fn from_iter<I: IntoIterator<Item = PageFeatures>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
