//! # AutoProbe Protocols
//!
//! Protocol definitions (traits) and shared data types for AutoProbe.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`VisionModel`] - Vision-language model client used for decisions and reflections
//! - [`BrowserDriver`] - Browser automation driver that performs gestures and screenshots
//! - [`DriverFactory`] - Creates a fresh driver per exploration session
//! - [`DesignSource`] - Source of design-file node trees
//! - [`Annotator`] - Draws operator-facing annotations on screenshots

pub mod annotate;
pub mod design;
pub mod driver;
pub mod error;
pub mod model;
pub mod signal;
pub mod types;

pub use annotate::Annotator;
pub use design::{find_node_by_id, normalize_node_id, DesignFile, DesignNode, DesignSource, Rect};
pub use driver::{BrowserDriver, DriverFactory};
pub use error::{AnnotateError, DesignError, DriverError, ExploreError, ModelError};
pub use model::VisionModel;
pub use signal::StopSignal;
pub use types::*;
