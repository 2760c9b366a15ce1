//! Comparison engine
//!
//! [`ComparisonEngine`] wires the analyzers together. It is constructed once
//! (validating its configuration and owning the embedding provider) and can
//! then serve any number of independent comparisons concurrently; no state
//! is carried between calls.

use crate::anomaly::AnomalyDetector;
use crate::composite::{aggregate, validate_weight};
use crate::config::EngineConfig;
use crate::handwriting::HandwritingComparator;
use crate::result::{PerDocument, SimilarityResult};
use crate::semantic::SemanticAnalyzer;
use crate::variation::PageVariationAnalyzer;
use docsim_core::{DocumentFeatures, Result};
use docsim_provider::{EmbeddingProvider, HashingEmbedder};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub struct ComparisonEngine {
    config: EngineConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    handwriting: HandwritingComparator,
    anomaly: AnomalyDetector,
    semantic: SemanticAnalyzer,
}

impl ComparisonEngine {
    /// Engine backed by the built-in hashing embedder
    pub fn new(config: EngineConfig) -> Result<Self> {
        let embedder = Arc::new(HashingEmbedder::new(config.embedding_dim));
        Self::with_embedder(config, embedder)
    }

    /// Engine backed by a caller-supplied embedding provider
    pub fn with_embedder(mut config: EngineConfig, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        config.validate()?;

        let variation = PageVariationAnalyzer::new(config.variation_threshold);
        Ok(Self {
            handwriting: HandwritingComparator::new(config.handwriting_weights),
            anomaly: AnomalyDetector::new(config.anomaly_threshold, config.deviation_method, variation),
            semantic: SemanticAnalyzer::new(config.inconsistency_threshold),
            embedder,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compare two documents.
    ///
    /// Empty handwriting features yield a zero handwriting score; texts
    /// without any usable segment, or a `weight_text` outside [0, 1], fail
    /// the whole comparison.
    pub fn compare_documents(
        &self,
        doc1_features: &DocumentFeatures,
        doc2_features: &DocumentFeatures,
        doc1_text: &str,
        doc2_text: &str,
        weight_text: f64,
    ) -> Result<SimilarityResult> {
        let weight_text = validate_weight(weight_text)?;

        let (semantic, (handwriting, (report1, report2))) = rayon::join(
            || self.semantic.analyze(doc1_text, doc2_text, self.embedder.as_ref()),
            || {
                rayon::join(
                    || self.handwriting.compare(doc1_features, doc2_features),
                    || {
                        rayon::join(
                            || self.anomaly.report(doc1_features),
                            || self.anomaly.report(doc2_features),
                        )
                    },
                )
            },
        );
        let semantic = semantic?;
        let (handwriting_similarity, feature_scores) = handwriting;

        let similarity_index = aggregate(semantic.similarity, handwriting_similarity, weight_text);

        debug!(
            text_similarity = semantic.similarity,
            handwriting_similarity,
            similarity_index,
            weight_text,
            "comparison complete"
        );

        Ok(SimilarityResult {
            text_similarity: semantic.similarity,
            handwriting_similarity,
            similarity_index,
            weight_text,
            feature_scores,
            anomalies: PerDocument::new(report1.anomalies, report2.anomalies),
            variations: PerDocument::new(report1.variations, report2.variations),
            consistency_analysis: semantic.consistency,
            page_characteristics: PerDocument::new(report1.page_characteristics, report2.page_characteristics),
        })
    }

    /// [`compare_documents`](Self::compare_documents) with the configured default text weight
    pub fn compare_with_default_weight(
        &self,
        doc1_features: &DocumentFeatures,
        doc2_features: &DocumentFeatures,
        doc1_text: &str,
        doc2_text: &str,
    ) -> Result<SimilarityResult> {
        self.compare_documents(
            doc1_features,
            doc2_features,
            doc1_text,
            doc2_text,
            self.config.default_weight_text,
        )
    }
}

impl fmt::Debug for ComparisonEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonEngine")
            .field("config", &self.config)
            .field("embedding_dim", &self.embedder.dimension())
            .finish()
    }
}
