//! Semantic similarity and internal consistency
//!
//! Both texts are split into line segments and embedded through an
//! [`EmbeddingProvider`]. Cross-document similarity averages, over the first
//! document's segments, the best cosine match found in the second document.
//! Within each document, adjacent segments whose cosine similarity falls
//! below the inconsistency threshold are reported as abrupt breaks.

use docsim_core::stats::clamp_unit;
use docsim_core::{segment_text, Error, InconsistencyEntry, Result, SegmentEmbeddings};
use docsim_provider::{embed_segments, CachedEmbedder, EmbeddingProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inconsistencies found in each document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyAnalysis {
    pub doc1: Vec<InconsistencyEntry>,
    pub doc2: Vec<InconsistencyEntry>,
}

/// Outcome of a semantic comparison
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticAnalysis {
    pub similarity: f64,
    pub consistency: ConsistencyAnalysis,
}

#[derive(Debug, Clone)]
pub struct SemanticAnalyzer {
    inconsistency_threshold: f64,
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl SemanticAnalyzer {
    pub fn new(inconsistency_threshold: f64) -> Self {
        Self { inconsistency_threshold }
    }

    /// Compare two texts using `embedder` for segment vectors.
    ///
    /// Fails with [`Error::EmptyInput`] when either text has no non-empty
    /// line, or when every segment of a document failed to embed.
    pub fn analyze<P>(&self, text1: &str, text2: &str, embedder: &P) -> Result<SemanticAnalysis>
    where
        P: EmbeddingProvider + ?Sized,
    {
        let segments1 = segment_text(text1);
        let segments2 = segment_text(text2);

        if segments1.is_empty() {
            return Err(Error::EmptyInput("document 1 has no text segments".to_string()));
        }
        if segments2.is_empty() {
            return Err(Error::EmptyInput("document 2 has no text segments".to_string()));
        }

        // Shared across both documents so repeated lines embed identically
        let cached = CachedEmbedder::new(embedder);
        let (embedded1, embedded2) = rayon::join(
            || embed_segments(&cached, segments1),
            || embed_segments(&cached, segments2),
        );

        let embeddings1 = SegmentEmbeddings::new(embedded1)?;
        let embeddings2 = SegmentEmbeddings::new(embedded2)?;

        let similarity = self.compare_embeddings(&embeddings1, &embeddings2)?;
        let consistency = ConsistencyAnalysis {
            doc1: self.internal_consistency(&embeddings1),
            doc2: self.internal_consistency(&embeddings2),
        };

        debug!(
            similarity,
            segments1 = embeddings1.len(),
            segments2 = embeddings2.len(),
            inconsistencies1 = consistency.doc1.len(),
            inconsistencies2 = consistency.doc2.len(),
            "semantic analysis complete"
        );

        Ok(SemanticAnalysis { similarity, consistency })
    }

    /// Mean best-match cosine similarity of `doc1` against `doc2`, in [0, 1]
    pub fn compare_embeddings(&self, doc1: &SegmentEmbeddings, doc2: &SegmentEmbeddings) -> Result<f64> {
        if doc1.is_empty() || doc2.is_empty() {
            return Err(Error::EmptyInput(
                "no embedded segments to compare".to_string(),
            ));
        }
        if doc1.dim() != doc2.dim() {
            return Err(Error::InvalidDimension {
                expected: doc1.dim(),
                actual: doc2.dim(),
            });
        }

        doc1.mean_max_cosine(doc2)
            .map(clamp_unit)
            .ok_or_else(|| Error::EmptyInput("no embedded segments to compare".to_string()))
    }

    /// Adjacent segment pairs whose similarity falls below the threshold
    pub fn internal_consistency(&self, document: &SegmentEmbeddings) -> Vec<InconsistencyEntry> {
        let segments = document.segments();

        document
            .adjacent_cosines()
            .into_iter()
            .enumerate()
            .filter(|(_, similarity)| *similarity < self.inconsistency_threshold)
            .map(|(i, similarity)| {
                let current = &segments[i];
                InconsistencyEntry {
                    segment_index: current.index,
                    segment_text: current.text.clone(),
                    next_segment_text: segments[i + 1].text.clone(),
                    similarity_score: clamp_unit(similarity),
                    line_number: current.index + 1,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsim_provider::{EmbeddingError, EmbeddingResult, HashingEmbedder};

    /// Maps known lines to fixed directions
    struct TableEmbedder;

    impl EmbeddingProvider for TableEmbedder {
        fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
            match text {
                "alpha" => Ok(vec![1.0, 0.0, 0.0]),
                "alpha again" => Ok(vec![0.99, 0.01, 0.0]),
                "beta" => Ok(vec![0.0, 1.0, 0.0]),
                "gamma" => Ok(vec![0.0, 0.0, 1.0]),
                "opposite" => Ok(vec![-1.0, 0.0, 0.0]),
                "fails" => Err(EmbeddingError::Provider("unavailable".to_string())),
                _ => Ok(vec![1.0, 1.0, 1.0]),
            }
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    #[test]
    fn test_identical_texts_score_one() {
        let text = "alpha\nbeta\ngamma";
        let analysis = SemanticAnalyzer::default().analyze(text, text, &TableEmbedder).unwrap();
        assert!((analysis.similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_best_match_average() {
        // alpha -> alpha (1.0), gamma -> best of {alpha, beta} (0.0)
        let analysis = SemanticAnalyzer::default()
            .analyze("alpha\ngamma", "alpha\nbeta", &TableEmbedder)
            .unwrap();
        assert!((analysis.similarity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_negative_similarity_clamped() {
        let analysis = SemanticAnalyzer::default()
            .analyze("opposite", "alpha", &TableEmbedder)
            .unwrap();
        assert_eq!(analysis.similarity, 0.0);
    }

    #[test]
    fn test_unrelated_adjacent_lines_reported() {
        let analysis = SemanticAnalyzer::default()
            .analyze("alpha\n\nalpha again\nbeta", "alpha", &TableEmbedder)
            .unwrap();

        let doc1 = &analysis.consistency.doc1;
        assert_eq!(doc1.len(), 1);
        assert_eq!(doc1[0].segment_index, 1);
        assert_eq!(doc1[0].line_number, 2);
        assert_eq!(doc1[0].segment_text, "alpha again");
        assert_eq!(doc1[0].next_segment_text, "beta");
        assert!(doc1[0].similarity_score < 0.05);
        assert!(analysis.consistency.doc2.is_empty());
    }

    #[test]
    fn test_identical_adjacent_lines_never_reported() {
        let analysis = SemanticAnalyzer::default()
            .analyze("alpha\nalpha\nalpha", "beta\nbeta", &TableEmbedder)
            .unwrap();
        assert!(analysis.consistency.doc1.is_empty());
        assert!(analysis.consistency.doc2.is_empty());
    }

    #[test]
    fn test_empty_text_is_an_error() {
        let analyzer = SemanticAnalyzer::default();
        assert!(matches!(
            analyzer.analyze("  \n\n", "alpha", &TableEmbedder),
            Err(Error::EmptyInput(_))
        ));
        assert!(matches!(
            analyzer.analyze("alpha", "", &TableEmbedder),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_failed_segments_are_skipped() {
        let analysis = SemanticAnalyzer::default()
            .analyze("alpha\nfails\nalpha", "alpha", &TableEmbedder)
            .unwrap();
        assert!((analysis.similarity - 1.0).abs() < 1e-6);
        assert!(analysis.consistency.doc1.is_empty());
    }

    #[test]
    fn test_all_segments_failing_is_an_error() {
        assert!(matches!(
            SemanticAnalyzer::default().analyze("fails", "alpha", &TableEmbedder),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_hashing_embedder_end_to_end() {
        let embedder = HashingEmbedder::default();
        let text = "The contract is signed on Monday\nPayment is due within thirty days";
        let analysis = SemanticAnalyzer::default().analyze(text, text, &embedder).unwrap();
        assert!((analysis.similarity - 1.0).abs() < 1e-5);
    }
}
