//! Screenshot annotation protocol.

use std::path::Path;

use crate::error::AnnotateError;
use crate::types::{BoundingBox, Point, SwipeDirection, UIElement};

/// Draws operator-facing marks on screenshots.
///
/// Coordinates are in screenshot space, i.e. relative to the captured region.
pub trait Annotator: Send + Sync {
    /// Draw every element's box with its 1-based index; write to `dst`.
    fn label_elements(
        &self,
        src: &Path,
        dst: &Path,
        elements: &[UIElement],
        dark_mode: bool,
    ) -> Result<(), AnnotateError>;

    /// Draw a single highlighted box; write to `dst`.
    fn mark_element(&self, src: &Path, dst: &Path, bbox: &BoundingBox)
    -> Result<(), AnnotateError>;

    /// Draw a tap marker in place.
    fn draw_circle(&self, path: &Path, center: Point) -> Result<(), AnnotateError>;

    /// Draw a swipe arrow in place.
    fn draw_arrow(
        &self,
        path: &Path,
        start: Point,
        direction: SwipeDirection,
        distance_px: f64,
    ) -> Result<(), AnnotateError>;
}
