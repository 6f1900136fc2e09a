//! Overlay Layer
//!
//! Renderer-agnostic highlight regions. A renderer draws these fractional
//! rectangles over the displayed image at whatever on-screen pixel size it
//! uses; nothing here touches a concrete UI toolkit.

pub mod projector;

pub use projector::project;

use serde::{Deserialize, Serialize};

/// A rectangle expressed as fractions of image width/height, each component
/// in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A highlight region for one matched token.
///
/// Derived 1:1 from a matched annotation; recomputed whenever the image frame
/// or its known dimensions change, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayRect {
    /// Display text (verbatim token text)
    pub label: String,
    /// Position and size relative to the displayed image
    pub rect: NormalizedRect,
}
