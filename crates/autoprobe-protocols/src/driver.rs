//! Browser automation protocol.
//!
//! All coordinates are page coordinates: callers add the canvas offset
//! before invoking a gesture.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DriverError;
use crate::types::{CanvasGeometry, Point, Region, SwipeDirection};

/// A browser showing one prototype.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Load the prototype, unlocking it with `password` if it is protected.
    async fn open(&self, url: &str, password: Option<&str>) -> Result<(), DriverError>;

    /// Position and size of the prototype canvas.
    async fn canvas_geometry(&self) -> Result<CanvasGeometry, DriverError>;

    /// Capture `region` of the page as a PNG at `path`.
    async fn take_screenshot(&self, region: Region, path: &Path) -> Result<(), DriverError>;

    /// Id of the screen currently shown, as it appears in the page URL.
    async fn current_node_id(&self) -> Result<String, DriverError>;

    async fn tap(&self, point: Point) -> Result<(), DriverError>;

    async fn long_press(&self, point: Point) -> Result<(), DriverError>;

    /// Drag from `start` by `distance_px` in `direction`.
    async fn swipe(
        &self,
        start: Point,
        direction: SwipeDirection,
        distance_px: f64,
    ) -> Result<(), DriverError>;

    /// Navigate back one screen.
    async fn back(&self) -> Result<(), DriverError>;

    /// Release the browser page.
    async fn close(&self) -> Result<(), DriverError>;
}

/// Creates a driver for each initialized session.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    async fn create(&self) -> Result<Arc<dyn BrowserDriver>, DriverError>;
}
