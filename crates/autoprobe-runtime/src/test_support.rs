//! Scripted in-memory collaborators for exercising the exploration loop.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use autoprobe_protocols::{
    AnnotateError, Annotator, BoundingBox, BrowserDriver, CanvasGeometry, DesignError, DesignFile,
    DesignSource, DriverError, DriverFactory, ModelError, Point, Region, StopSignal,
    SwipeDirection, UIElement, VisionModel,
};

/// Design file with a "Home" screen (1:2) holding three interactive
/// elements and a "Settings" screen (1:8).
///
/// Home sits at (100, 200), 375 x 812. Its elements, in reading order:
/// 1:3 Header (0,0)-(40,10), 1:4 Settings (10,10)-(30,30), 1:5 Buy (50,10)-(70,30).
pub fn sample_design() -> DesignFile {
    serde_json::from_value(json!({
        "name": "Shop",
        "document": {
            "id": "0:0",
            "type": "DOCUMENT",
            "children": [{
                "id": "0:1",
                "type": "CANVAS",
                "children": [
                    {
                        "id": "1:2",
                        "name": "Home",
                        "type": "FRAME",
                        "absoluteBoundingBox": {"x": 100.0, "y": 200.0, "width": 375.0, "height": 812.0},
                        "children": [
                            {
                                "id": "1:6",
                                "name": "Background",
                                "type": "RECTANGLE",
                                "absoluteBoundingBox": {"x": 100.0, "y": 200.0, "width": 375.0, "height": 812.0}
                            },
                            {
                                "id": "1:5",
                                "name": "Buy",
                                "type": "INSTANCE",
                                "transitionNodeID": "1:8",
                                "absoluteBoundingBox": {"x": 150.0, "y": 210.0, "width": 20.0, "height": 20.0}
                            },
                            {
                                "id": "1:4",
                                "name": "Settings",
                                "type": "INSTANCE",
                                "reactions": [{"action": {"type": "NODE", "destinationId": "1:8"}, "trigger": {"type": "ON_CLICK"}}],
                                "absoluteBoundingBox": {"x": 110.0, "y": 210.0, "width": 20.0, "height": 20.0}
                            },
                            {
                                "id": "1:3",
                                "name": "Header",
                                "type": "INSTANCE",
                                "transitionNodeID": "1:8",
                                "absoluteBoundingBox": {"x": 100.0, "y": 200.0, "width": 40.0, "height": 10.0}
                            },
                            {
                                "id": "1:7",
                                "name": "Hidden",
                                "type": "INSTANCE",
                                "visible": false,
                                "transitionNodeID": "1:8",
                                "absoluteBoundingBox": {"x": 100.0, "y": 500.0, "width": 40.0, "height": 40.0}
                            }
                        ]
                    },
                    {
                        "id": "1:8",
                        "name": "Settings",
                        "type": "FRAME",
                        "absoluteBoundingBox": {"x": 600.0, "y": 200.0, "width": 375.0, "height": 812.0},
                        "children": [{
                            "id": "1:10",
                            "name": "Close",
                            "type": "INSTANCE",
                            "transitionNodeID": "1:2",
                            "absoluteBoundingBox": {"x": 610.0, "y": 210.0, "width": 30.0, "height": 30.0}
                        }]
                    }
                ]
            }]
        }
    }))
    .unwrap()
}

/// Model that replays canned responses and records every request.
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, ModelError>>>,
    calls: Mutex<Vec<(String, Vec<PathBuf>)>>,
    stop_on_call: Option<(usize, Arc<StopSignal>)>,
    delay: Duration,
}

impl ScriptedModel {
    pub fn new(script: Vec<Result<String, ModelError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
            stop_on_call: None,
            delay: Duration::ZERO,
        }
    }

    /// Raise `signal` while serving the `n`-th request (1-based).
    pub fn stopping_on_call(mut self, n: usize, signal: Arc<StopSignal>) -> Self {
        self.stop_on_call = Some((n, signal));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<PathBuf>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl VisionModel for ScriptedModel {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn get_response(&self, prompt: &str, images: &[PathBuf]) -> Result<String, ModelError> {
        let n = {
            let mut calls = self.calls.lock();
            calls.push((prompt.to_string(), images.to_vec()));
            calls.len()
        };
        if let Some((at, signal)) = &self.stop_on_call {
            if *at == n {
                signal.stop();
            }
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::InvalidResponse("script exhausted".into())))
    }
}

/// Gesture and navigation calls seen by [`FakeDriver`].
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Open(String, Option<String>),
    Tap(Point),
    LongPress(Point),
    Swipe(Point, SwipeDirection, f64),
    Back,
    Close,
}

/// Driver that writes placeholder screenshots and records gestures.
pub struct FakeDriver {
    node_id: Mutex<String>,
    canvas: CanvasGeometry,
    calls: Mutex<Vec<DriverCall>>,
    screenshots: Mutex<Vec<(Region, PathBuf)>>,
    fail_gestures: bool,
    fail_open: bool,
}

impl FakeDriver {
    pub fn new(node_id: &str) -> Self {
        Self {
            node_id: Mutex::new(node_id.to_string()),
            canvas: Region::new(0.0, 40.0, 1280.0, 900.0),
            calls: Mutex::new(Vec::new()),
            screenshots: Mutex::new(Vec::new()),
            fail_gestures: false,
            fail_open: false,
        }
    }

    pub fn failing_gestures(mut self) -> Self {
        self.fail_gestures = true;
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().clone()
    }

    pub fn screenshots(&self) -> Vec<(Region, PathBuf)> {
        self.screenshots.lock().clone()
    }

    pub fn back_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| **c == DriverCall::Back)
            .count()
    }

    fn gesture(&self, call: DriverCall) -> Result<(), DriverError> {
        if self.fail_gestures {
            return Err(DriverError::GestureFailed(format!("{:?}", call)));
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn open(&self, url: &str, password: Option<&str>) -> Result<(), DriverError> {
        if self.fail_open {
            return Err(DriverError::NavigationFailed(url.to_string()));
        }
        self.calls
            .lock()
            .push(DriverCall::Open(url.to_string(), password.map(String::from)));
        Ok(())
    }

    async fn canvas_geometry(&self) -> Result<CanvasGeometry, DriverError> {
        Ok(self.canvas)
    }

    async fn take_screenshot(&self, region: Region, path: &Path) -> Result<(), DriverError> {
        tokio::fs::write(path, b"png").await?;
        self.screenshots.lock().push((region, path.to_path_buf()));
        Ok(())
    }

    async fn current_node_id(&self) -> Result<String, DriverError> {
        Ok(self.node_id.lock().clone())
    }

    async fn tap(&self, point: Point) -> Result<(), DriverError> {
        self.gesture(DriverCall::Tap(point))
    }

    async fn long_press(&self, point: Point) -> Result<(), DriverError> {
        self.gesture(DriverCall::LongPress(point))
    }

    async fn swipe(
        &self,
        start: Point,
        direction: SwipeDirection,
        distance_px: f64,
    ) -> Result<(), DriverError> {
        self.gesture(DriverCall::Swipe(start, direction, distance_px))
    }

    async fn back(&self) -> Result<(), DriverError> {
        self.gesture(DriverCall::Back)
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.calls.lock().push(DriverCall::Close);
        Ok(())
    }
}

/// Hands out one shared [`FakeDriver`].
pub struct FakeDriverFactory {
    pub driver: Arc<FakeDriver>,
    /// Simulated browser start-up time.
    pub delay: Duration,
}

#[async_trait]
impl DriverFactory for FakeDriverFactory {
    async fn create(&self) -> Result<Arc<dyn BrowserDriver>, DriverError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.driver.clone())
    }
}

/// Annotator that copies images unchanged and records marks.
#[derive(Default)]
pub struct FakeAnnotator {
    labeled: Mutex<Vec<(PathBuf, Vec<UIElement>)>>,
    circles: Mutex<Vec<Point>>,
    arrows: Mutex<Vec<(Point, SwipeDirection, f64)>>,
}

impl FakeAnnotator {
    pub fn labeled(&self) -> Vec<(PathBuf, Vec<UIElement>)> {
        self.labeled.lock().clone()
    }

    pub fn circles(&self) -> Vec<Point> {
        self.circles.lock().clone()
    }

    pub fn arrows(&self) -> Vec<(Point, SwipeDirection, f64)> {
        self.arrows.lock().clone()
    }
}

impl Annotator for FakeAnnotator {
    fn label_elements(
        &self,
        src: &Path,
        dst: &Path,
        elements: &[UIElement],
        _dark_mode: bool,
    ) -> Result<(), AnnotateError> {
        std::fs::copy(src, dst)?;
        self.labeled.lock().push((dst.to_path_buf(), elements.to_vec()));
        Ok(())
    }

    fn mark_element(
        &self,
        src: &Path,
        dst: &Path,
        _bbox: &BoundingBox,
    ) -> Result<(), AnnotateError> {
        std::fs::copy(src, dst)?;
        Ok(())
    }

    fn draw_circle(&self, _path: &Path, center: Point) -> Result<(), AnnotateError> {
        self.circles.lock().push(center);
        Ok(())
    }

    fn draw_arrow(
        &self,
        _path: &Path,
        start: Point,
        direction: SwipeDirection,
        distance_px: f64,
    ) -> Result<(), AnnotateError> {
        self.arrows.lock().push((start, direction, distance_px));
        Ok(())
    }
}

/// Design source serving a fixed file and counting fetches.
pub struct FakeDesignSource {
    file: DesignFile,
    fetches: Mutex<Vec<String>>,
}

impl FakeDesignSource {
    pub fn new(file: DesignFile) -> Self {
        Self {
            file,
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().clone()
    }
}

#[async_trait]
impl DesignSource for FakeDesignSource {
    async fn fetch_file(
        &self,
        file_key: &str,
        _cache_dir: Option<&Path>,
    ) -> Result<DesignFile, DesignError> {
        self.fetches.lock().push(file_key.to_string());
        if file_key == "missing" {
            return Err(DesignError::ApiError {
                status: 404,
                message: "Not found".into(),
            });
        }
        Ok(self.file.clone())
    }
}

/// Decision response in the labeled format.
pub fn decision(action: &str, summary: &str) -> Result<String, ModelError> {
    Ok(format!(
        "Observation: a screen\nThought: next step\nAction: {}\nSummary: {}",
        action, summary
    ))
}

/// Reflection response in the labeled format.
pub fn verdict(decision: &str, documentation: &str) -> Result<String, ModelError> {
    Ok(format!(
        "Decision: {}\nThought: compared screens\nDocumentation: {}",
        decision, documentation
    ))
}
