//! Comparison request payloads shared by the REST API and the CLI

use docsim_core::{DocumentFeatures, Result};
use docsim_provider::document_features;
use docsim_similarity::{ComparisonEngine, SimilarityResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One side of a comparison.
///
/// Handwriting features may be supplied directly, or as raw per-page
/// recognition responses that are translated on arrival. When both are
/// present the explicit features win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Extracted document text
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<DocumentFeatures>,
    /// One recognition response per page, in page order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognition: Option<Vec<Value>>,
}

impl DocumentInput {
    pub fn resolve_features(&self) -> DocumentFeatures {
        match (&self.features, &self.recognition) {
            (Some(features), _) => features.clone(),
            (None, Some(pages)) => document_features(pages.iter().cloned().map(Ok)),
            (None, None) => DocumentFeatures::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareRequest {
    pub document1: DocumentInput,
    pub document2: DocumentInput,
    /// Text weight in [0, 1]; the engine default applies when absent
    #[serde(default)]
    pub weight_text: Option<f64>,
}

impl CompareRequest {
    pub fn run(&self, engine: &ComparisonEngine) -> Result<SimilarityResult> {
        let features1 = self.document1.resolve_features();
        let features2 = self.document2.resolve_features();
        let (text1, text2) = (&self.document1.text, &self.document2.text);

        match self.weight_text {
            Some(weight_text) => engine.compare_documents(&features1, &features2, text1, text2, weight_text),
            None => engine.compare_with_default_weight(&features1, &features2, text1, text2),
        }
    }
}
