//! OCR Boundary Layer
//!
//! Consumes the output of an external word-level OCR engine. The engine is a
//! black box; this module only deserializes its document, normalizes nested
//! block/paragraph/line structures into a flat token sequence, and validates
//! each word entry on the way in.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Pixel-space bounding box of one recognized word, in the coordinate space
/// of the OCR-processed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from corner coordinates
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width in pixels
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height in pixels
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// One OCR-detected word with its bounding box and confidence.
///
/// Immutable per scan; a new capture produces a fresh token set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedToken {
    /// Raw recognized string (may contain OCR noise/typos)
    pub text: String,
    /// Bounding box in OCR pixel space
    pub bbox: BoundingBox,
    /// Engine confidence score, 0-100. Engines without per-word confidence
    /// omit it; such tokens pass the confidence gate.
    pub confidence: Option<f32>,
}

impl RecognizedToken {
    /// Create a token with a known confidence score
    pub fn new(text: impl Into<String>, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            confidence: Some(confidence),
        }
    }
}

/// Raw OCR document as emitted by word-level engines.
///
/// Engines disagree on shape: some report a flat `words` list, others only a
/// nested block/paragraph/line/word tree. Both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrDocument {
    /// Full recognized text of the frame
    #[serde(default)]
    pub text: String,
    /// Flat word list (preferred when present)
    #[serde(default)]
    pub words: Vec<RawWord>,
    /// Nested structure fallback
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
}

/// One word entry before validation. Fields are optional because engine
/// output is not trusted at this boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWord {
    pub text: Option<String>,
    pub bbox: Option<BoundingBox>,
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBlock {
    #[serde(default)]
    pub paragraphs: Vec<RawParagraph>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParagraph {
    #[serde(default)]
    pub lines: Vec<RawLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLine {
    #[serde(default)]
    pub words: Vec<RawWord>,
}

impl OcrDocument {
    /// Flatten the document into an ordered token sequence.
    ///
    /// Prefers the flat word list; falls back to walking the nested
    /// block/paragraph/line tree when the flat list is empty. Word entries
    /// missing their text or bounding box are skipped so one bad entry never
    /// suppresses the rest of the batch.
    pub fn flatten_tokens(&self) -> Vec<RecognizedToken> {
        let raw: Vec<&RawWord> = if !self.words.is_empty() {
            self.words.iter().collect()
        } else {
            self.blocks
                .iter()
                .flat_map(|b| &b.paragraphs)
                .flat_map(|p| &p.lines)
                .flat_map(|l| &l.words)
                .collect()
        };

        let mut tokens = Vec::with_capacity(raw.len());
        let mut skipped = 0usize;

        for word in raw {
            match (&word.text, &word.bbox) {
                (Some(text), Some(bbox)) => tokens.push(RecognizedToken {
                    text: text.clone(),
                    bbox: *bbox,
                    confidence: word.confidence,
                }),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!("Skipped {} malformed OCR word entries", skipped);
        }
        debug!("Flattened OCR document into {} tokens", tokens.len());

        tokens
    }

    /// Full recognized text with newlines collapsed to spaces.
    ///
    /// Forwarded to the classification collaborator; the matcher never reads
    /// it. When the engine omits the whole-text field, token texts are joined
    /// instead.
    pub fn full_text(&self) -> String {
        if !self.text.is_empty() {
            return self.text.replace('\n', " ");
        }

        self.flatten_tokens()
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
