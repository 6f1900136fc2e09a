//! Overlay projector
//!
//! Maps a matched token's pixel bounding box into normalized [0,1]
//! coordinates. Pure function of its inputs; safe to call concurrently for
//! different annotations.

use tracing::warn;

use crate::analysis::MatchedAnnotation;
use crate::config::ProjectionSettings;
use crate::ocr::BoundingBox;
use crate::overlay::{NormalizedRect, OverlayRect};

/// Project a matched annotation into a normalized overlay rectangle.
///
/// With known, nonzero image dimensions each coordinate is the pixel value
/// divided by the image dimension, clamped to [0,1] and constrained so the
/// rectangle stays inside the unit square (OCR boxes can extend past the
/// nominal image bounds). Unknown or zero dimensions take the degraded
/// fallback path instead; that is a warning condition, never a failure.
pub fn project(
    annotation: &MatchedAnnotation,
    image_width: Option<u32>,
    image_height: Option<u32>,
    settings: &ProjectionSettings,
) -> OverlayRect {
    let bbox = &annotation.token.bbox;

    let rect = match (image_width, image_height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            project_exact(bbox, width as f32, height as f32)
        }
        _ => {
            warn!(
                token = %annotation.token.text,
                "Image dimensions unknown, using degraded projection"
            );
            project_fallback(bbox, settings)
        }
    };

    OverlayRect {
        label: annotation.token.text.clone(),
        rect,
    }
}

/// Primary path: divide by the true image dimensions and clamp.
fn project_exact(bbox: &BoundingBox, width: f32, height: f32) -> NormalizedRect {
    let left = (bbox.x0 / width).clamp(0.0, 1.0);
    let top = (bbox.y0 / height).clamp(0.0, 1.0);
    let w = (bbox.width() / width).clamp(0.0, 1.0);
    let h = (bbox.height() / height).clamp(0.0, 1.0);

    NormalizedRect {
        left,
        top,
        // Keep the rectangle inside the unit square
        width: w.min(1.0 - left),
        height: h.min(1.0 - top),
    }
}

/// Degraded path: anchor by an assumed reference dimension and emit a fixed
/// minimum-visible box so the highlight lands approximately right instead of
/// off-screen.
fn project_fallback(bbox: &BoundingBox, settings: &ProjectionSettings) -> NormalizedRect {
    let reference = settings.fallback_reference_dim.max(1.0);

    let left = (bbox.x0 / reference).clamp(0.0, 1.0);
    let top = (bbox.y0 / reference).clamp(0.0, 1.0);

    NormalizedRect {
        left,
        top,
        width: settings.fallback_width.clamp(0.0, 1.0 - left),
        height: settings.fallback_height.clamp(0.0, 1.0 - top),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FlaggedTerm;
    use crate::ocr::RecognizedToken;

    fn annotation(text: &str, bbox: BoundingBox) -> MatchedAnnotation {
        MatchedAnnotation {
            token: RecognizedToken::new(text, bbox, 90.0),
            term: FlaggedTerm::new(text),
        }
    }

    #[test]
    fn test_projection_round_trip() {
        let ann = annotation("sugar", BoundingBox::new(192.0, 108.0, 384.0, 162.0));
        let settings = ProjectionSettings::default();

        let overlay = project(&ann, Some(1920), Some(1080), &settings);

        assert_eq!(overlay.label, "sugar");
        assert!((overlay.rect.left - 0.10).abs() < 0.001);
        assert!((overlay.rect.top - 0.10).abs() < 0.001);
        assert!((overlay.rect.width - 0.10).abs() < 0.001);
        assert!((overlay.rect.height - 0.05).abs() < 0.001);
    }

    #[test]
    fn test_projection_clamps_overflowing_box() {
        // Box extends past the right image edge
        let ann = annotation("syrup", BoundingBox::new(900.0, 50.0, 1200.0, 100.0));
        let settings = ProjectionSettings::default();

        let overlay = project(&ann, Some(1000), Some(500), &settings);

        assert!(overlay.rect.left + overlay.rect.width <= 1.0 + f32::EPSILON);
        assert!((overlay.rect.left - 0.9).abs() < 0.001);
        assert!((overlay.rect.width - 0.1).abs() < 0.001);
    }

    #[test]
    fn test_projection_clamps_negative_coordinates() {
        let ann = annotation("salt", BoundingBox::new(-20.0, -10.0, 30.0, 40.0));
        let settings = ProjectionSettings::default();

        let overlay = project(&ann, Some(100), Some(100), &settings);

        assert!(overlay.rect.left >= 0.0);
        assert!(overlay.rect.top >= 0.0);
        assert!(overlay.rect.left + overlay.rect.width <= 1.0);
        assert!(overlay.rect.top + overlay.rect.height <= 1.0);
    }

    #[test]
    fn test_fallback_when_dimensions_unknown() {
        let ann = annotation("sugar", BoundingBox::new(200.0, 100.0, 260.0, 120.0));
        let settings = ProjectionSettings::default();

        let overlay = project(&ann, None, None, &settings);

        // Anchored by the reference dimension, fixed minimum visible size
        assert!((overlay.rect.left - 0.5).abs() < 0.001);
        assert!((overlay.rect.top - 0.25).abs() < 0.001);
        assert!((overlay.rect.width - 0.15).abs() < 0.001);
        assert!((overlay.rect.height - 0.05).abs() < 0.001);
    }

    #[test]
    fn test_fallback_stays_on_screen_for_far_coordinates() {
        // Coordinates beyond the assumed reference dimension must not push
        // the rectangle off-screen.
        let ann = annotation("sugar", BoundingBox::new(3000.0, 2000.0, 3100.0, 2050.0));
        let settings = ProjectionSettings::default();

        let overlay = project(&ann, None, None, &settings);

        assert!(overlay.rect.left <= 1.0);
        assert!(overlay.rect.top <= 1.0);
        assert!(overlay.rect.left + overlay.rect.width <= 1.0);
        assert!(overlay.rect.top + overlay.rect.height <= 1.0);
    }

    #[test]
    fn test_zero_dimensions_take_fallback_path() {
        let ann = annotation("sugar", BoundingBox::new(40.0, 40.0, 80.0, 60.0));
        let settings = ProjectionSettings::default();

        let overlay = project(&ann, Some(0), Some(0), &settings);

        assert!((overlay.rect.width - settings.fallback_width).abs() < 0.001);
        assert!((overlay.rect.height - settings.fallback_height).abs() < 0.001);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let ann = annotation("sugar", BoundingBox::new(10.0, 20.0, 30.0, 40.0));
        let settings = ProjectionSettings::default();

        let first = project(&ann, Some(640), Some(480), &settings);
        let second = project(&ann, Some(640), Some(480), &settings);

        assert_eq!(first, second);
    }
}
