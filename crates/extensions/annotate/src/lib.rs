//! Screenshot annotation.
//!
//! Draws numbered element boxes for the decision prompt and gesture marks
//! (tap circles, swipe arrows) for the report.

mod annotator;

pub use annotator::{ImageAnnotator, LabelStyle};
