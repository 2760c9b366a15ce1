//! Engine configuration
//!
//! Thresholds and weights used by the analyzers. Every field has a default,
//! so a partial JSON file only overrides what it names.

use docsim_core::{Error, HandwritingMetric, Result};
use docsim_provider::DEFAULT_EMBEDDING_DIM;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration shared by all engine components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deviation score above which a paragraph metric is an anomaly (default: 2.0)
    pub anomaly_threshold: f64,

    /// How a paragraph's deviation from its page is measured
    pub deviation_method: DeviationMethod,

    /// Absolute change in a page mean that counts as a variation (default: 0.15)
    pub variation_threshold: f64,

    /// Adjacent-segment cosine similarity below which an inconsistency is reported (default: 0.05)
    pub inconsistency_threshold: f64,

    /// Weights of the four handwriting metrics
    pub handwriting_weights: HandwritingWeights,

    /// Text weight used when a caller does not supply one (default: 0.5)
    pub default_weight_text: f64,

    /// Dimension of the built-in hashing embedder (default: 384)
    pub embedding_dim: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            anomaly_threshold: 2.0,
            deviation_method: DeviationMethod::default(),
            variation_threshold: 0.15,
            inconsistency_threshold: 0.05,
            handwriting_weights: HandwritingWeights::default(),
            default_weight_text: 0.5,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl EngineConfig {
    /// Load a JSON configuration file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let mut config: EngineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges and normalize handwriting weights to sum to 1.0
    pub fn validate(&mut self) -> std::result::Result<(), ConfigError> {
        for (name, value) in [
            ("anomaly_threshold", self.anomaly_threshold),
            ("variation_threshold", self.variation_threshold),
            ("inconsistency_threshold", self.inconsistency_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        if !(0.0..=1.0).contains(&self.default_weight_text) {
            return Err(ConfigError::WeightTextOutOfRange(self.default_weight_text));
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroEmbeddingDim);
        }

        self.handwriting_weights.validate_and_normalize()
    }
}

/// Deviation measure for anomaly detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationMethod {
    /// |value - mean| / population standard deviation
    StandardScore,
    /// Robust score around the median: 0.6745 * |value - median| / MAD,
    /// falling back to |value - median| / (1.253314 * MeanAD) when MAD is 0
    #[default]
    ModifiedZScore,
}

/// Weights of the handwriting metrics in the combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandwritingWeights {
    pub confidence: f64,
    pub symbol_density: f64,
    pub line_breaks: f64,
    pub average_confidence: f64,
}

impl Default for HandwritingWeights {
    fn default() -> Self {
        Self {
            confidence: 0.3,
            symbol_density: 0.3,
            line_breaks: 0.2,
            average_confidence: 0.2,
        }
    }
}

impl HandwritingWeights {
    pub fn weight(&self, metric: HandwritingMetric) -> f64 {
        match metric {
            HandwritingMetric::Confidence => self.confidence,
            HandwritingMetric::SymbolDensity => self.symbol_density,
            HandwritingMetric::LineBreaks => self.line_breaks,
            HandwritingMetric::AverageSymbolConfidence => self.average_confidence,
        }
    }

    fn sum(&self) -> f64 {
        HandwritingMetric::ALL.iter().map(|m| self.weight(*m)).sum()
    }

    /// Reject negative weights and rescale so the weights sum to 1.0
    pub fn validate_and_normalize(&mut self) -> std::result::Result<(), ConfigError> {
        for metric in HandwritingMetric::ALL {
            let weight = self.weight(metric);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::NegativeWeight(metric));
            }
        }

        let weight_sum = self.sum();
        if weight_sum <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight);
        }

        if (weight_sum - 1.0).abs() > 0.001 {
            self.confidence /= weight_sum;
            self.symbol_density /= weight_sum;
            self.line_breaks /= weight_sum;
            self.average_confidence /= weight_sum;
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Threshold '{name}' must be a non-negative number, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Weight for '{0}' must be a non-negative number")]
    NegativeWeight(HandwritingMetric),

    #[error("Total handwriting weight cannot be zero")]
    ZeroTotalWeight,

    #[error("default_weight_text must be in [0, 1], got {0}")]
    WeightTextOutOfRange(f64),

    #[error("embedding_dim must be positive")]
    ZeroEmbeddingDim,
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}
