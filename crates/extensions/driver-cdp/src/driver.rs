//! `BrowserDriver` over a single Chrome tab.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use tracing::{debug, info};

use autoprobe_protocols::{
    normalize_node_id, BrowserDriver, CanvasGeometry, DriverError, DriverFactory, Point, Region,
    SwipeDirection,
};

use crate::cdp::{CdpClient, PageSession, ScreenshotFormat, Viewport};
use crate::scripts;

/// Driver settings.
#[derive(Debug, Clone)]
pub struct CdpDriverConfig {
    /// Chrome remote debugging HTTP endpoint.
    pub endpoint: String,
    /// How long the button is held for a long press.
    pub long_press_ms: u64,
    /// Intermediate pointer moves per swipe.
    pub swipe_steps: u32,
    /// Page load and canvas wait timeout.
    pub load_timeout: Duration,
}

impl Default for CdpDriverConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9222".to_string(),
            long_press_ms: 1000,
            swipe_steps: 10,
            load_timeout: Duration::from_secs(30),
        }
    }
}

/// A prototype open in one Chrome tab.
pub struct CdpBrowserDriver {
    client: CdpClient,
    page: PageSession,
    config: CdpDriverConfig,
}

impl CdpBrowserDriver {
    /// Connect to Chrome and open a fresh tab.
    pub async fn connect(config: CdpDriverConfig) -> Result<Self, DriverError> {
        let client = CdpClient::connect(&config.endpoint).await?;
        let page = client.new_page().await?;
        info!(
            "Opened browser tab {} via {}",
            page.target_id(),
            client.browser_ws_url()
        );
        Ok(Self {
            client,
            page,
            config,
        })
    }

    async fn unlock(&self, password: &str) -> Result<(), DriverError> {
        let gated = self
            .page
            .evaluate(scripts::PASSWORD_FIELD_PRESENT)
            .await?
            .as_bool()
            .unwrap_or(false);
        if !gated {
            debug!("No password gate shown; continuing");
            return Ok(());
        }

        let submitted = self
            .page
            .evaluate(&scripts::submit_password(password))
            .await?
            .as_bool()
            .unwrap_or(false);
        if !submitted {
            return Err(DriverError::ElementNotFound(
                "password submit control".to_string(),
            ));
        }
        debug!("Submitted prototype password");
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for CdpBrowserDriver {
    async fn open(&self, url: &str, password: Option<&str>) -> Result<(), DriverError> {
        let timeout = self.config.load_timeout;
        self.page.navigate(url, timeout).await?;

        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.unlock(password).await?;
        }

        self.page
            .wait_until(scripts::CANVAS_READY, timeout)
            .await
            .map_err(|_| DriverError::ElementNotFound("prototype canvas".to_string()))?;

        info!("Prototype loaded: {}", url);
        Ok(())
    }

    async fn canvas_geometry(&self) -> Result<CanvasGeometry, DriverError> {
        let value = self.page.evaluate(scripts::CANVAS_RECT).await?;
        if value.is_null() {
            return Err(DriverError::ElementNotFound("prototype canvas".to_string()));
        }
        serde_json::from_value::<Region>(value)
            .map_err(|e| DriverError::Other(format!("Invalid canvas rect: {}", e)))
    }

    async fn take_screenshot(&self, region: Region, path: &Path) -> Result<(), DriverError> {
        let clip = Viewport {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
            scale: 1.0,
        };
        let data = self
            .page
            .screenshot(ScreenshotFormat::Png, Some(clip))
            .await
            .map_err(|e| DriverError::ScreenshotFailed(e.to_string()))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| DriverError::ScreenshotFailed(e.to_string()))?;
        tokio::fs::write(path, bytes).await?;
        debug!("Saved screenshot to {}", path.display());
        Ok(())
    }

    async fn current_node_id(&self) -> Result<String, DriverError> {
        let url = self.page.get_url().await?;
        node_id_from_url(&url)
            .ok_or_else(|| DriverError::Other(format!("No node-id in page URL: {}", url)))
    }

    async fn tap(&self, point: Point) -> Result<(), DriverError> {
        self.page
            .click(point.x, point.y)
            .await
            .map_err(|e| DriverError::GestureFailed(format!("tap at ({}, {}): {}", point.x, point.y, e)))
    }

    async fn long_press(&self, point: Point) -> Result<(), DriverError> {
        let gesture = async {
            self.page.mouse_move(point.x, point.y, false).await?;
            self.page.mouse_press(point.x, point.y).await?;
            tokio::time::sleep(Duration::from_millis(self.config.long_press_ms)).await;
            self.page.mouse_release(point.x, point.y).await
        };
        gesture.await.map_err(|e| {
            DriverError::GestureFailed(format!("long press at ({}, {}): {}", point.x, point.y, e))
        })
    }

    async fn swipe(
        &self,
        start: Point,
        direction: SwipeDirection,
        distance_px: f64,
    ) -> Result<(), DriverError> {
        let path = swipe_path(start, direction, distance_px, self.config.swipe_steps);
        let end = path.last().copied().unwrap_or(start);
        let gesture = async {
            self.page.mouse_move(start.x, start.y, false).await?;
            self.page.mouse_press(start.x, start.y).await?;
            for p in &path {
                self.page.mouse_move(p.x, p.y, true).await?;
            }
            self.page.mouse_release(end.x, end.y).await
        };
        gesture.await.map_err(|e| {
            DriverError::GestureFailed(format!(
                "swipe {} from ({}, {}): {}",
                direction, start.x, start.y, e
            ))
        })
    }

    async fn back(&self) -> Result<(), DriverError> {
        self.page.go_back(self.config.load_timeout).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.client.close_page(self.page.target_id()).await?;
        info!("Closed browser tab {}", self.page.target_id());
        Ok(())
    }
}

/// Creates one Chrome tab per session.
pub struct CdpDriverFactory {
    config: CdpDriverConfig,
}

impl CdpDriverFactory {
    pub fn new(config: CdpDriverConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DriverFactory for CdpDriverFactory {
    async fn create(&self) -> Result<Arc<dyn BrowserDriver>, DriverError> {
        let driver = CdpBrowserDriver::connect(self.config.clone()).await?;
        Ok(Arc::new(driver))
    }
}

/// Screen id from a prototype page URL's `node-id` query parameter.
pub fn node_id_from_url(page_url: &str) -> Option<String> {
    let parsed = url::Url::parse(page_url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "node-id")
        .map(|(_, value)| normalize_node_id(&value))
        .filter(|id| !id.is_empty())
}

/// Pointer positions after `start` for a drag of `distance` in `direction`,
/// split into `steps` equal moves. The last point is the drag end.
pub fn swipe_path(
    start: Point,
    direction: SwipeDirection,
    distance: f64,
    steps: u32,
) -> Vec<Point> {
    let steps = steps.max(1);
    let (dx, dy) = direction.unit();
    (1..=steps)
        .map(|i| {
            let t = distance * f64::from(i) / f64::from(steps);
            Point::new(start.x + dx * t, start.y + dy * t)
        })
        .collect()
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
