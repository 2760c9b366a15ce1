//! Recognition payload adapter
//!
//! Translates document-text-detection responses (one per rasterized page)
//! into [`PageFeatures`]. The payload shape is
//! `fullTextAnnotation.pages[].blocks[].paragraphs[].words[].symbols[]`,
//! optionally wrapped in a batch `{"responses": [...]}` envelope.
//!
//! A page whose response is malformed or reports an error degrades to an
//! empty [`PageFeatures`]; it never aborts the whole document.

use docsim_core::{DocumentFeatures, FeatureRecord, PageFeatures};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors for a single page's recognition response
#[derive(Debug, Clone, Error)]
pub enum RecognitionError {
    #[error("Malformed recognition payload: {0}")]
    Malformed(String),

    #[error("Recognition provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("Recognition request failed: {0}")]
    Request(String),
}

#[derive(Debug, Default, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    #[serde(default)]
    full_text_annotation: Option<TextAnnotation>,
    #[serde(default)]
    error: Option<Status>,
}

#[derive(Debug, Default, Deserialize)]
struct Status {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Default, Deserialize)]
struct Page {
    #[serde(default)]
    blocks: Vec<Block>,
}

#[derive(Debug, Default, Deserialize)]
struct Block {
    #[serde(default)]
    paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Default, Deserialize)]
struct Paragraph {
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    words: Vec<Word>,
}

#[derive(Debug, Default, Deserialize)]
struct Word {
    #[serde(default)]
    symbols: Vec<Symbol>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Symbol {
    #[serde(default)]
    text: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    property: Option<TextProperty>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextProperty {
    #[serde(default)]
    detected_break: Option<DetectedBreak>,
}

#[derive(Debug, Default, Deserialize)]
struct DetectedBreak {
    #[serde(rename = "type", default)]
    break_type: Option<String>,
}

impl Symbol {
    fn is_alphanumeric(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_alphanumeric)
    }

    fn has_break(&self) -> bool {
        self.property
            .as_ref()
            .and_then(|p| p.detected_break.as_ref())
            .and_then(|b| b.break_type.as_deref())
            .is_some_and(|t| !t.is_empty())
    }
}

impl Paragraph {
    /// `None` for paragraphs without words
    fn to_record(&self) -> Option<FeatureRecord> {
        if self.words.is_empty() {
            return None;
        }

        let symbols: Vec<&Symbol> = self.words.iter().flat_map(|w| w.symbols.iter()).collect();
        let symbol_count = symbols.len();

        let (symbol_density, average_symbol_confidence) = if symbol_count == 0 {
            (0.0, 0.0)
        } else {
            let non_alnum = symbols.iter().filter(|s| !s.is_alphanumeric()).count();
            let confidence_sum: f64 = symbols.iter().map(|s| s.confidence).sum();
            (
                non_alnum as f64 / symbol_count as f64,
                confidence_sum / symbol_count as f64,
            )
        };

        let line_breaks = symbols.iter().filter(|s| s.has_break()).count();

        Some(FeatureRecord::new(
            self.confidence,
            u32::try_from(self.words.len()).unwrap_or(u32::MAX),
            symbol_density,
            u32::try_from(line_breaks).unwrap_or(u32::MAX),
            average_symbol_confidence,
        ))
    }
}

impl AnnotateImageResponse {
    /// Paragraph records across every annotated page of this response
    pub fn page_features(&self) -> PageFeatures {
        let records = self
            .full_text_annotation
            .iter()
            .flat_map(|annotation| annotation.pages.iter())
            .flat_map(|page| page.blocks.iter())
            .flat_map(|block| block.paragraphs.iter())
            .filter_map(Paragraph::to_record)
            .collect::<Vec<_>>();
        PageFeatures::new(records)
    }
}

/// Parse one page's recognition payload into paragraph features.
///
/// Accepts either a single image response or a batch envelope whose first
/// response is used. A response without a text annotation yields an empty
/// page; a response carrying an error status is an error.
pub fn parse_page(payload: &Value) -> Result<PageFeatures, RecognitionError> {
    let response: AnnotateImageResponse = if payload.get("responses").is_some() {
        let batch: BatchResponse = serde_json::from_value(payload.clone())
            .map_err(|e| RecognitionError::Malformed(e.to_string()))?;
        batch.responses.into_iter().next().unwrap_or_default()
    } else {
        serde_json::from_value(payload.clone())
            .map_err(|e| RecognitionError::Malformed(e.to_string()))?
    };

    if let Some(status) = response.error {
        return Err(RecognitionError::Provider {
            code: status.code,
            message: status.message,
        });
    }

    Ok(response.page_features())
}

/// Assemble a document from per-page recognition outcomes, in page order.
///
/// Failed pages are kept as empty pages so page numbering stays aligned
/// with the source document.
pub fn document_features<I>(pages: I) -> DocumentFeatures
where
    I: IntoIterator<Item = Result<Value, RecognitionError>>,
{
    pages
        .into_iter()
        .enumerate()
        .map(|(index, outcome)| {
            match outcome.and_then(|payload| parse_page(&payload)) {
                Ok(page) => {
                    debug!(page = index + 1, paragraphs = page.len(), "extracted page features");
                    page
                }
                Err(e) => {
                    warn!(page = index + 1, error = %e, "recognition failed, using empty page");
                    PageFeatures::empty()
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn symbol(text: &str, confidence: f64, brk: Option<&str>) -> Value {
        match brk {
            Some(t) => json!({"text": text, "confidence": confidence, "property": {"detectedBreak": {"type": t}}}),
            None => json!({"text": text, "confidence": confidence}),
        }
    }

    fn sample_response() -> Value {
        json!({
            "fullTextAnnotation": {
                "pages": [{
                    "blocks": [{
                        "paragraphs": [
                            {
                                "confidence": 0.9,
                                "words": [
                                    {"symbols": [symbol("H", 0.9, None), symbol("i", 0.7, Some("SPACE"))]},
                                    {"symbols": [symbol("!", 0.8, Some("LINE_BREAK"))]}
                                ]
                            },
                            { "confidence": 0.5, "words": [] }
                        ]
                    }]
                }]
            }
        })
    }

    #[test]
    fn test_parse_page_extracts_paragraph_metrics() {
        let page = parse_page(&sample_response()).unwrap();
        assert_eq!(page.len(), 1);

        let record = page.paragraphs()[0];
        assert_eq!(record.confidence, 0.9);
        assert_eq!(record.word_count, 2);
        assert_eq!(record.line_breaks, 2);
        assert!((record.symbol_density - 1.0 / 3.0).abs() < 1e-9);
        assert!((record.average_symbol_confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_batch_envelope() {
        let payload = json!({ "responses": [sample_response()] });
        let page = parse_page(&payload).unwrap();
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn test_words_without_symbols_default_to_zero() {
        let payload = json!({
            "fullTextAnnotation": {"pages": [{"blocks": [{"paragraphs": [
                {"confidence": 0.6, "words": [{"symbols": []}]}
            ]}]}]}
        });
        let page = parse_page(&payload).unwrap();
        let record = page.paragraphs()[0];
        assert_eq!(record.average_symbol_confidence, 0.0);
        assert_eq!(record.symbol_density, 0.0);
    }

    #[test]
    fn test_no_annotation_is_empty_page() {
        let page = parse_page(&json!({})).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_error_status_is_reported() {
        let payload = json!({"error": {"code": 7, "message": "quota exceeded"}});
        assert!(matches!(
            parse_page(&payload),
            Err(RecognitionError::Provider { code: 7, .. })
        ));
    }

    #[test]
    fn test_malformed_payload() {
        let payload = json!({"fullTextAnnotation": {"pages": "not a list"}});
        assert!(matches!(parse_page(&payload), Err(RecognitionError::Malformed(_))));
    }

    #[test]
    fn test_failed_pages_degrade_to_empty() {
        let doc = document_features(vec![
            Ok(sample_response()),
            Err(RecognitionError::Request("timeout".to_string())),
            Ok(json!({"error": {"code": 3, "message": "bad image"}})),
            Ok(sample_response()),
        ]);

        assert_eq!(doc.page_count(), 4);
        assert_eq!(doc.pages()[0].len(), 1);
        assert!(doc.pages()[1].is_empty());
        assert!(doc.pages()[2].is_empty());
        assert_eq!(doc.pages()[3].len(), 1);
    }
}
