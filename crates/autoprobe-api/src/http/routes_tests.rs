use super::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use autoprobe_protocols::{
    AnnotateError, Annotator, BoundingBox, BrowserDriver, CanvasGeometry, DesignError,
    DesignFile, DesignNode, DesignSource, DriverError, DriverFactory, ModelError, Point, Region,
    SwipeDirection, UIElement, VisionModel,
};
use autoprobe_runtime::{
    ControllerServices, LabeledResponseParser, SessionConfig, SessionController,
};

const URL: &str = "https://www.figma.com/proto/abc123/Shop?starting-point-node-id=1%3A2";

struct FinishingModel {
    delay: Duration,
}

#[async_trait]
impl VisionModel for FinishingModel {
    fn id(&self) -> &str {
        "finishing"
    }

    async fn get_response(&self, _prompt: &str, _images: &[PathBuf]) -> Result<String, ModelError> {
        tokio::time::sleep(self.delay).await;
        Ok("Observation: home\nThought: done\nAction: FINISH\nSummary: nothing to do".into())
    }
}

struct StaticDriver;

#[async_trait]
impl BrowserDriver for StaticDriver {
    async fn open(&self, _url: &str, _password: Option<&str>) -> Result<(), DriverError> {
        Ok(())
    }

    async fn canvas_geometry(&self) -> Result<CanvasGeometry, DriverError> {
        Ok(Region::new(0.0, 0.0, 1280.0, 900.0))
    }

    async fn take_screenshot(&self, _region: Region, path: &Path) -> Result<(), DriverError> {
        tokio::fs::write(path, b"png").await?;
        Ok(())
    }

    async fn current_node_id(&self) -> Result<String, DriverError> {
        Ok("1:2".into())
    }

    async fn tap(&self, _point: Point) -> Result<(), DriverError> {
        Ok(())
    }

    async fn long_press(&self, _point: Point) -> Result<(), DriverError> {
        Ok(())
    }

    async fn swipe(&self, _: Point, _: SwipeDirection, _: f64) -> Result<(), DriverError> {
        Ok(())
    }

    async fn back(&self) -> Result<(), DriverError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), DriverError> {
        Ok(())
    }
}

struct StaticDriverFactory;

#[async_trait]
impl DriverFactory for StaticDriverFactory {
    async fn create(&self) -> Result<Arc<dyn BrowserDriver>, DriverError> {
        Ok(Arc::new(StaticDriver))
    }
}

struct StaticDesign;

#[async_trait]
impl DesignSource for StaticDesign {
    async fn fetch_file(
        &self,
        _file_key: &str,
        _cache_dir: Option<&Path>,
    ) -> Result<DesignFile, DesignError> {
        let home = DesignNode::new("1:2", "FRAME")
            .with_name("Home")
            .with_bounds(0.0, 0.0, 375.0, 812.0)
            .with_child(
                DesignNode::new("1:3", "INSTANCE")
                    .with_bounds(10.0, 10.0, 20.0, 20.0)
                    .with_transition("1:2"),
            );
        Ok(DesignFile {
            name: "Shop".into(),
            document: DesignNode::new("0:0", "DOCUMENT").with_child(home),
        })
    }
}

struct CopyAnnotator;

impl Annotator for CopyAnnotator {
    fn label_elements(
        &self,
        src: &Path,
        dst: &Path,
        _elements: &[UIElement],
        _dark_mode: bool,
    ) -> Result<(), AnnotateError> {
        std::fs::copy(src, dst)?;
        Ok(())
    }

    fn mark_element(&self, src: &Path, dst: &Path, _bbox: &BoundingBox) -> Result<(), AnnotateError> {
        std::fs::copy(src, dst)?;
        Ok(())
    }

    fn draw_circle(&self, _path: &Path, _center: Point) -> Result<(), AnnotateError> {
        Ok(())
    }

    fn draw_arrow(&self, _: &Path, _: Point, _: SwipeDirection, _: f64) -> Result<(), AnnotateError> {
        Ok(())
    }
}

fn create_test_router(dir: &TempDir, model_delay: Duration) -> Router {
    let services = ControllerServices {
        model: Arc::new(FinishingModel { delay: model_delay }),
        parser: Arc::new(LabeledResponseParser),
        design_source: Arc::new(StaticDesign),
        driver_factory: Arc::new(StaticDriverFactory),
        annotator: Arc::new(CopyAnnotator),
    };
    let config = SessionConfig {
        request_interval: Duration::ZERO,
        ..SessionConfig::default()
    };
    let controller = Arc::new(
        SessionController::new(services, config).with_stop_timeout(Duration::from_secs(2)),
    );
    create_router(Arc::new(AppState::new(controller, dir.path())))
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn wait_idle(app: &Router) -> Value {
    for _ in 0..100 {
        let (_, body) = send(app, get("/exploration_status")).await;
        if body["status"] == "idle" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("exploration did not finish");
}

#[tokio::test]
async fn test_status_when_idle() {
    let dir = TempDir::new().unwrap();
    let app = create_test_router(&dir, Duration::ZERO);

    let (status, body) = send(&app, get("/exploration_status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["initialized"], false);
}

#[tokio::test]
async fn test_explore_requires_init() {
    let dir = TempDir::new().unwrap();
    let app = create_test_router(&dir, Duration::ZERO);

    let (status, body) = send(&app, post("/explore", json!({"task_desc": "buy a hat"}))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Session not initialized");
}

#[tokio::test]
async fn test_init_rejects_bad_url() {
    let dir = TempDir::new().unwrap();
    let app = create_test_router(&dir, Duration::ZERO);

    let (status, body) = send(
        &app,
        post("/init", json!({"app": "Shop", "url": "https://www.figma.com/proto/abc123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_full_exploration_flow() {
    let dir = TempDir::new().unwrap();
    let app = create_test_router(&dir, Duration::ZERO);

    let (status, body) = send(&app, post("/init", json!({"app": "My Shop", "url": URL}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["session"]["app"], "MyShop");

    let (status, body) = send(
        &app,
        post("/explore", json!({"task_desc": "buy a hat", "persona_desc": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Exploration started");

    let body = wait_idle(&app).await;
    assert_eq!(body["last_outcome"]["status"], "success");
    assert_eq!(body["last_outcome"]["rounds"], 1);

    let (status, body) = send(&app, get("/get_report")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["content"]
        .as_str()
        .unwrap()
        .starts_with("# User Testing Report for MyShop"));

    let (status, body) = send(&app, post("/get_image", json!({"file_path": "1_before.png"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image_data"], "cG5n");

    let (status, _) = send(&app, post("/get_image", json!({"file_path": "missing.png"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        post("/get_image", json!({"file_path": "../../../etc/passwd"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_explore_refused_while_running_then_stopped() {
    let dir = TempDir::new().unwrap();
    let app = create_test_router(&dir, Duration::from_millis(300));

    send(&app, post("/init", json!({"app": "Shop", "url": URL}))).await;
    let (status, _) = send(&app, post("/explore", json!({"task_desc": "buy a hat"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get("/exploration_status")).await;
    assert_eq!(body["status"], "in_progress");

    let (status, body) = send(&app, post("/explore", json!({"task_desc": "buy a hat"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Exploration already in progress");

    let (status, body) = send(&app, post("/stop_exploration", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (_, body) = send(&app, get("/exploration_status")).await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["initialized"], false);
}

#[tokio::test]
async fn test_report_unavailable_before_init() {
    let dir = TempDir::new().unwrap();
    let app = create_test_router(&dir, Duration::ZERO);

    let (status, body) = send(&app, get("/get_report")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}
