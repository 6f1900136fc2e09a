//! Scan Pipeline
//!
//! Pure composition of matcher and projector: `(tokens, terms, dimensions)`
//! in, an explicit `ScanResult` value out. The presentation layer only ever
//! renders the latest result; there is no incremental state to keep ordered.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{match_tokens, FlaggedTerm};
use crate::config::AppConfig;
use crate::ocr::RecognizedToken;
use crate::overlay::{project, OverlayRect};

/// Terminal status of one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// No flagged ingredient was located on the label
    Clean,
    /// At least one highlight was produced
    Flagged,
}

/// Aggregate of one completed scan.
///
/// Created at the end of a scan and replaces the previous result wholesale on
/// the next capture; no partial or streaming updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Reference to the scanned image, when the capture source has one
    pub source: Option<String>,
    /// Full recognized text of the label
    pub full_text: String,
    /// Highlight regions in input token order
    pub overlays: Vec<OverlayRect>,
    /// Terminal status
    pub status: ScanStatus,
}

impl ScanResult {
    pub fn new(
        source: Option<String>,
        full_text: String,
        overlays: Vec<OverlayRect>,
        status: ScanStatus,
    ) -> Self {
        Self {
            source,
            full_text,
            overlays,
            status,
        }
    }
}

/// Run the pure matching-and-projection pipeline for one scan.
///
/// Total for well-typed input: empty tokens or empty terms yield zero
/// overlays and a clean status, never an error.
pub fn run_pipeline(
    tokens: &[RecognizedToken],
    terms: &[FlaggedTerm],
    image_width: Option<u32>,
    image_height: Option<u32>,
    config: &AppConfig,
) -> (Vec<OverlayRect>, ScanStatus) {
    let annotations = match_tokens(tokens, terms, &config.matching);
    debug!(
        "Matched {} of {} tokens against {} flagged terms",
        annotations.len(),
        tokens.len(),
        terms.len()
    );

    let overlays: Vec<OverlayRect> = annotations
        .iter()
        .map(|annotation| project(annotation, image_width, image_height, &config.projection))
        .collect();

    let status = if overlays.is_empty() {
        ScanStatus::Clean
    } else {
        ScanStatus::Flagged
    };

    (overlays, status)
}
