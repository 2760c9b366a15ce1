//! Text segmentation and per-document segment embeddings
//!
//! A document's text is split into [`SemanticSegment`]s (one per non-empty
//! trimmed line) and each segment is paired with its embedding. Cross-document
//! similarity uses late-interaction scoring: every segment of one document is
//! matched with its best counterpart in the other, and the best-match scores
//! are averaged.

use crate::error::{Error, Result};
use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// One non-empty, trimmed line of document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticSegment {
    /// Position in the document's segment sequence
    pub index: usize,
    pub text: String,
}

/// Split text on line boundaries, trimming and dropping blank lines
pub fn segment_text(text: &str) -> Vec<SemanticSegment> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| SemanticSegment {
            index,
            text: line.to_string(),
        })
        .collect()
}

/// Segments of one document paired 1:1 with their embeddings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentEmbeddings {
    segments: Vec<SemanticSegment>,
    vectors: Vec<Vector>,
    dim: usize,
}

impl SegmentEmbeddings {
    /// Build from (segment, embedding) pairs in document order.
    /// All embeddings must share one dimension.
    pub fn new(pairs: Vec<(SemanticSegment, Vector)>) -> Result<Self> {
        let dim = pairs.first().map(|(_, v)| v.dim()).unwrap_or(0);

        if let Some((_, bad)) = pairs.iter().find(|(_, v)| v.dim() != dim) {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: bad.dim(),
            });
        }

        let (segments, vectors) = pairs.into_iter().unzip();
        Ok(Self { segments, vectors, dim })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn segments(&self) -> &[SemanticSegment] {
        &self.segments
    }

    #[inline]
    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    /// Average over `self`'s segments of the best cosine match in `other`.
    ///
    /// Returns `None` when either side has no segments.
    pub fn mean_max_cosine(&self, other: &SegmentEmbeddings) -> Option<f64> {
        if self.is_empty() || other.is_empty() {
            return None;
        }

        let total: f64 = self
            .vectors
            .iter()
            .map(|query| {
                other
                    .vectors
                    .iter()
                    .map(|candidate| f64::from(query.cosine_similarity(candidate)))
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .sum();

        Some(total / self.len() as f64)
    }

    /// Cosine similarity of each adjacent pair `(i, i + 1)`
    pub fn adjacent_cosines(&self) -> Vec<f64> {
        self.vectors
            .windows(2)
            .map(|pair| f64::from(pair[0].cosine_similarity(&pair[1])))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(index: usize, text: &str) -> SemanticSegment {
        SemanticSegment { index, text: text.to_string() }
    }

    #[test]
    fn test_segment_text_trims_and_skips_blank_lines() {
        let segments = segment_text("  first line \n\n   \nsecond\r\n third  ");
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["first line", "second", "third"]);
        assert_eq!(segments[2].index, 2);
    }

    #[test]
    fn test_segment_empty_text() {
        assert!(segment_text("").is_empty());
        assert!(segment_text("\n \n\t\n").is_empty());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = SegmentEmbeddings::new(vec![
            (seg(0, "a"), Vector::new(vec![1.0, 0.0])),
            (seg(1, "b"), Vector::new(vec![1.0, 0.0, 0.0])),
        ]);
        assert!(matches!(
            result,
            Err(Error::InvalidDimension { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_mean_max_cosine_takes_best_match() {
        let doc1 = SegmentEmbeddings::new(vec![
            (seg(0, "a"), Vector::new(vec![1.0, 0.0])),
            (seg(1, "b"), Vector::new(vec![0.0, 1.0])),
        ])
        .unwrap();
        let doc2 = SegmentEmbeddings::new(vec![
            (seg(0, "x"), Vector::new(vec![0.0, 2.0])),
            (seg(1, "y"), Vector::new(vec![1.0, 1.0])),
        ])
        .unwrap();

        // a -> y (0.707), b -> x (1.0)
        let score = doc1.mean_max_cosine(&doc2).unwrap();
        let expected = (std::f64::consts::FRAC_1_SQRT_2 + 1.0) / 2.0;
        assert!((score - expected).abs() < 1e-5);
    }

    #[test]
    fn test_mean_max_cosine_empty_is_none() {
        let doc = SegmentEmbeddings::new(vec![(seg(0, "a"), Vector::new(vec![1.0]))]).unwrap();
        let empty = SegmentEmbeddings::default();
        assert_eq!(doc.mean_max_cosine(&empty), None);
        assert_eq!(empty.mean_max_cosine(&doc), None);
    }

    #[test]
    fn test_adjacent_cosines() {
        let doc = SegmentEmbeddings::new(vec![
            (seg(0, "a"), Vector::new(vec![1.0, 0.0])),
            (seg(1, "b"), Vector::new(vec![1.0, 0.0])),
            (seg(2, "c"), Vector::new(vec![0.0, 1.0])),
        ])
        .unwrap();
        let cosines = doc.adjacent_cosines();
        assert_eq!(cosines.len(), 2);
        assert!((cosines[0] - 1.0).abs() < 1e-6);
        assert!(cosines[1].abs() < 1e-6);
    }
}
