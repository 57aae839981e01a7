//! `Annotator` backed by the `image` and `imageproc` crates.

use std::path::Path;

use ab_glyph::{FontRef, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
    draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;
use tracing::debug;

use autoprobe_protocols::{AnnotateError, Annotator, BoundingBox, Point, SwipeDirection, UIElement};

const MARK_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const GESTURE_COLOR: Rgba<u8> = Rgba([0, 120, 255, 255]);
const LABEL_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono-Bold.ttf");
const LABEL_SIZE: f32 = 16.0;
const LABEL_PADDING: u32 = 2;
const BOX_THICKNESS: u32 = 2;
const MARK_THICKNESS: u32 = 3;
const CIRCLE_RADIUS: i32 = 20;
const ARROW_HEAD_LENGTH: f32 = 16.0;

/// Colours for element boxes and index tags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Box outline and tag background.
    pub background: Rgba<u8>,
    /// Index digits.
    pub foreground: Rgba<u8>,
}

impl LabelStyle {
    /// Dark screens get light tags, light screens get dark tags.
    pub fn for_mode(dark_mode: bool) -> Self {
        let dark = Rgba([10, 10, 10, 255]);
        let light = Rgba([255, 250, 250, 255]);
        if dark_mode {
            Self {
                background: light,
                foreground: dark,
            }
        } else {
            Self {
                background: dark,
                foreground: light,
            }
        }
    }
}

/// Draws annotations onto PNG screenshots.
#[derive(Debug, Clone)]
pub struct ImageAnnotator {
    font: FontRef<'static>,
}

impl ImageAnnotator {
    /// Annotator using the bundled label font.
    pub fn new() -> Result<Self, AnnotateError> {
        let font = FontRef::try_from_slice(LABEL_FONT)
            .map_err(|e| AnnotateError::Font(e.to_string()))?;
        Ok(Self { font })
    }
}

fn load(path: &Path) -> Result<RgbaImage, AnnotateError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| AnnotateError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

fn save(img: &RgbaImage, path: &Path) -> Result<(), AnnotateError> {
    img.save(path).map_err(|e| AnnotateError::Save {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Outline a box with the given stroke, growing inwards.
fn outline(img: &mut RgbaImage, bbox: &BoundingBox, thickness: u32, color: Rgba<u8>) {
    let left = bbox.top_left.x.round() as i32;
    let top = bbox.top_left.y.round() as i32;
    let width = bbox.width().round() as i64;
    let height = bbox.height().round() as i64;

    for inset in 0..thickness as i64 {
        let w = width - 2 * inset;
        let h = height - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let rect = Rect::at(left + inset as i32, top + inset as i32).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(img, rect, color);
    }
}

/// Draw `text` as a padded tag with its top-left corner at (`x`, `y`).
fn draw_tag(img: &mut RgbaImage, font: &FontRef<'_>, x: i32, y: i32, text: &str, style: LabelStyle) {
    let scale = PxScale::from(LABEL_SIZE);
    let (text_width, _) = text_size(scale, font, text);
    let width = text_width + 2 * LABEL_PADDING;
    let height = LABEL_SIZE.ceil() as u32 + 2 * LABEL_PADDING;
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(width, height), style.background);
    draw_text_mut(
        img,
        style.foreground,
        x + LABEL_PADDING as i32,
        y + LABEL_PADDING as i32,
        scale,
        font,
        text,
    );
}

/// End point and the two arrow-head barbs for a swipe.
fn arrow_geometry(
    start: Point,
    direction: SwipeDirection,
    distance_px: f64,
) -> ((f32, f32), [(f32, f32); 2]) {
    let (ux, uy) = direction.unit();
    let end = (
        (start.x + ux * distance_px) as f32,
        (start.y + uy * distance_px) as f32,
    );
    // Barbs point back along the shaft at +/-30 degrees.
    let (bx, by) = (-ux as f32, -uy as f32);
    let (sin, cos) = 30f32.to_radians().sin_cos();
    let barb = |s: f32| {
        (
            end.0 + ARROW_HEAD_LENGTH * (bx * cos - by * s * sin),
            end.1 + ARROW_HEAD_LENGTH * (bx * s * sin + by * cos),
        )
    };
    (end, [barb(1.0), barb(-1.0)])
}

/// A line two pixels wide.
fn thick_line(img: &mut RgbaImage, from: (f32, f32), to: (f32, f32), color: Rgba<u8>) {
    for (dx, dy) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
        draw_line_segment_mut(img, (from.0 + dx, from.1 + dy), (to.0 + dx, to.1 + dy), color);
    }
}

impl Annotator for ImageAnnotator {
    fn label_elements(
        &self,
        src: &Path,
        dst: &Path,
        elements: &[UIElement],
        dark_mode: bool,
    ) -> Result<(), AnnotateError> {
        let mut img = load(src)?;
        let style = LabelStyle::for_mode(dark_mode);

        for (i, element) in elements.iter().enumerate() {
            outline(&mut img, &element.bbox, BOX_THICKNESS, style.background);
            draw_tag(
                &mut img,
                &self.font,
                element.bbox.top_left.x.round() as i32,
                element.bbox.top_left.y.round() as i32,
                &(i + 1).to_string(),
                style,
            );
        }

        save(&img, dst)?;
        debug!("Labeled {} element(s) into {}", elements.len(), dst.display());
        Ok(())
    }

    fn mark_element(
        &self,
        src: &Path,
        dst: &Path,
        bbox: &BoundingBox,
    ) -> Result<(), AnnotateError> {
        let mut img = load(src)?;
        outline(&mut img, bbox, MARK_THICKNESS, MARK_COLOR);
        save(&img, dst)
    }

    fn draw_circle(&self, path: &Path, center: Point) -> Result<(), AnnotateError> {
        let mut img = load(path)?;
        let c = (center.x.round() as i32, center.y.round() as i32);
        for r in CIRCLE_RADIUS - 2..=CIRCLE_RADIUS {
            draw_hollow_circle_mut(&mut img, c, r, GESTURE_COLOR);
        }
        draw_filled_circle_mut(&mut img, c, 3, GESTURE_COLOR);
        save(&img, path)
    }

    fn draw_arrow(
        &self,
        path: &Path,
        start: Point,
        direction: SwipeDirection,
        distance_px: f64,
    ) -> Result<(), AnnotateError> {
        let mut img = load(path)?;
        let from = (start.x as f32, start.y as f32);
        let (end, barbs) = arrow_geometry(start, direction, distance_px);
        thick_line(&mut img, from, end, GESTURE_COLOR);
        for barb in barbs {
            thick_line(&mut img, end, barb, GESTURE_COLOR);
        }
        save(&img, path)
    }
}

#[cfg(test)]
#[path = "annotator_tests.rs"]
mod tests;
