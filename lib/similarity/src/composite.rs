//! Composite similarity index

use docsim_core::{Error, Result};

/// Weighted blend of the text and handwriting scores.
///
/// Both inputs are already in [0, 1], so for a weight in [0, 1] the result
/// is too; no further clipping is applied.
#[inline]
pub fn aggregate(text_similarity: f64, handwriting_similarity: f64, weight_text: f64) -> f64 {
    weight_text * text_similarity + (1.0 - weight_text) * handwriting_similarity
}

/// Accept a text weight only if it is a finite value in [0, 1]
pub fn validate_weight(weight_text: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&weight_text) {
        Ok(weight_text)
    } else {
        Err(Error::InvalidWeight(weight_text))
    }
}
