//! Scan Coordinator
//!
//! Drives one complete scan: OCR document in, classifier consulted, the pure
//! matching/projection pipeline run, and the result published into shared
//! state for a presentation layer to render.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::FlaggedTerm;
use crate::classifier::ClassifierClient;
use crate::ocr::OcrDocument;
use crate::scan::{run_pipeline, ScanResult};
use crate::shared::SharedAppState;

/// Labels shorter than this after OCR are noise, not an ingredient list.
const MIN_ANALYZABLE_TEXT: usize = 5;

/// Scan-level failures worth distinguishing from plumbing errors
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("recognized text too short to analyze ({length} chars)")]
    InsufficientText { length: usize },
}

/// Inputs for one scan
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// OCR document JSON for the captured frame
    pub ocr_path: PathBuf,
    /// The captured still, used for its true pixel dimensions
    pub image_path: Option<PathBuf>,
    /// Inline flagged terms; when present the classifier endpoint is skipped
    pub terms: Option<Vec<String>>,
}

/// Run one scan and publish the result.
///
/// The previous scan result, if any, is replaced wholesale.
pub fn run_scan(
    state: &Arc<RwLock<SharedAppState>>,
    request: &ScanRequest,
) -> Result<ScanResult> {
    let config = state.read().config.clone();

    // 1. OCR document (the engine itself already ran; we consume its output)
    let raw = std::fs::read_to_string(&request.ocr_path)
        .with_context(|| format!("Failed to read OCR document {:?}", request.ocr_path))?;
    let document: OcrDocument = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse OCR document {:?}", request.ocr_path))?;

    let tokens = document.flatten_tokens();
    let full_text = document.full_text();
    info!("OCR read {} tokens, {} chars of text", tokens.len(), full_text.len());

    let trimmed_len = full_text.trim().len();
    if trimmed_len < MIN_ANALYZABLE_TEXT {
        return Err(ScanError::InsufficientText { length: trimmed_len }.into());
    }

    // 2. Flagged terms, inline or from the classifier endpoint
    let terms: Vec<FlaggedTerm> = match &request.terms {
        Some(inline) => inline.iter().map(FlaggedTerm::new).collect(),
        None => {
            info!("Analyzing label text via {}", config.classifier.endpoint);
            let client = ClassifierClient::new(&config.classifier)?;
            client.classify(&full_text)?
        }
    };

    // 3. True pixel dimensions from the image header, when we have the image
    let dimensions = request.image_path.as_ref().and_then(|path| {
        match image::image_dimensions(path) {
            Ok(dims) => Some(dims),
            Err(e) => {
                warn!("Could not read dimensions of {:?}: {}", path, e);
                None
            }
        }
    });

    // 4. Pure pipeline
    let (image_width, image_height) = match dimensions {
        Some((w, h)) => (Some(w), Some(h)),
        None => (None, None),
    };
    let (overlays, status) = run_pipeline(&tokens, &terms, image_width, image_height, &config);

    info!("Scan complete: {} highlights, status {:?}", overlays.len(), status);

    let source = request
        .image_path
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned());
    let result = ScanResult::new(source, full_text, overlays, status);

    state.write().publish_scan(result.clone());

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::scan::ScanStatus;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn shared_state() -> Arc<RwLock<SharedAppState>> {
        Arc::new(RwLock::new(SharedAppState::new(AppConfig::default())))
    }

    fn ocr_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    const LABEL_JSON: &str = r#"{
        "text": "INGREDIENTS: sugar, salt, water",
        "words": [
            {"text": "sugar", "bbox": {"x0": 10, "y0": 0, "x1": 60, "y1": 20}, "confidence": 93},
            {"text": "salt", "bbox": {"x0": 70, "y0": 0, "x1": 110, "y1": 20}, "confidence": 91},
            {"text": "water", "bbox": {"x0": 120, "y0": 0, "x1": 170, "y1": 20}, "confidence": 95}
        ]
    }"#;

    #[test]
    fn test_scan_with_inline_terms_publishes_result() {
        let state = shared_state();
        let file = ocr_file(LABEL_JSON);

        let request = ScanRequest {
            ocr_path: file.path().to_path_buf(),
            image_path: None,
            terms: Some(vec!["sugar".to_string()]),
        };

        let result = run_scan(&state, &request).unwrap();

        assert_eq!(result.status, ScanStatus::Flagged);
        assert_eq!(result.overlays.len(), 1);
        assert_eq!(result.overlays[0].label, "sugar");

        // Published into shared state for the presentation layer
        let guard = state.read();
        assert_eq!(guard.latest_scan().unwrap(), &result);
    }

    #[test]
    fn test_scan_with_no_flagged_terms_is_clean() {
        let state = shared_state();
        let file = ocr_file(LABEL_JSON);

        let request = ScanRequest {
            ocr_path: file.path().to_path_buf(),
            image_path: None,
            terms: Some(vec![]),
        };

        let result = run_scan(&state, &request).unwrap();
        assert_eq!(result.status, ScanStatus::Clean);
        assert!(result.overlays.is_empty());
    }

    #[test]
    fn test_scan_rejects_too_short_text() {
        let state = shared_state();
        let file = ocr_file(r#"{"text": "ab", "words": []}"#);

        let request = ScanRequest {
            ocr_path: file.path().to_path_buf(),
            image_path: None,
            terms: Some(vec!["sugar".to_string()]),
        };

        let err = run_scan(&state, &request).unwrap_err();
        assert!(err.downcast_ref::<ScanError>().is_some());
        assert!(state.read().latest_scan().is_none());
    }

    #[test]
    fn test_scan_rejects_missing_ocr_file() {
        let state = shared_state();

        let request = ScanRequest {
            ocr_path: PathBuf::from("/nonexistent/ocr.json"),
            image_path: None,
            terms: Some(vec![]),
        };

        assert!(run_scan(&state, &request).is_err());
    }
}
