//! Exploration control handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, Json};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use autoprobe_runtime::{
    ExplorationOutcome, InitRequest, InitSummary, RunState, TaskBrief,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `POST /init`.
#[derive(Debug, Deserialize)]
pub struct InitBody {
    pub app: String,
    pub url: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub root_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct InitResponse {
    pub status: &'static str,
    pub message: String,
    pub session: InitSummary,
}

/// Body of `POST /explore`.
#[derive(Debug, Deserialize)]
pub struct ExploreBody {
    pub task_desc: String,
    #[serde(default)]
    pub persona_desc: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: RunState,
    pub message: &'static str,
    pub initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<ExplorationOutcome>,
}

/// Body of `POST /get_image`.
#[derive(Debug, Deserialize)]
pub struct ImageBody {
    pub file_path: String,
}

fn success(message: &str) -> Json<Value> {
    Json(json!({"status": "success", "message": message}))
}

/// POST /init
pub async fn init(
    State(state): State<Arc<AppState>>,
    Json(body): Json<InitBody>,
) -> Result<Json<InitResponse>, ApiError> {
    info!("Initializing exploration of {}", body.app);

    let request = InitRequest {
        app: body.app,
        url: body.url,
        password: body.password.filter(|p| !p.is_empty()),
        root_dir: body
            .root_dir
            .unwrap_or_else(|| state.default_root_dir.clone()),
    };
    let session = state.controller.initialize(request).await.map_err(|e| {
        error!("Initialization failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(InitResponse {
        status: "success",
        message: "Initialization completed".into(),
        session,
    }))
}

/// POST /explore
pub async fn explore(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExploreBody>,
) -> Result<Json<Value>, ApiError> {
    if body.task_desc.trim().is_empty() {
        return Err(ApiError::BadRequest("task_desc is empty".into()));
    }
    let brief = TaskBrief {
        task_description: body.task_desc,
        persona_description: body.persona_desc.filter(|p| !p.trim().is_empty()),
    };
    state.controller.start(brief).await?;
    Ok(success("Exploration started"))
}

/// POST /stop_exploration
pub async fn stop_exploration(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    info!("Stop exploration requested");
    state.controller.stop().await?;
    Ok(success("Exploration stopped and resources cleaned up"))
}

/// GET /exploration_status
pub async fn exploration_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let status = state.controller.status().await;
    let message = match status.state {
        RunState::InProgress => "Exploration is running",
        RunState::Idle => "No exploration in progress",
    };
    Json(StatusResponse {
        status: status.state,
        message,
        initialized: status.initialized,
        last_outcome: status.last_outcome,
    })
}

/// GET /get_report
pub async fn get_report(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let content = state.controller.report().await?;
    Ok(Json(json!({"status": "success", "content": content})))
}

/// POST /get_image
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ImageBody>,
) -> Result<Json<Value>, ApiError> {
    let bytes = state.controller.image(&body.file_path).await?;
    Ok(Json(json!({
        "status": "success",
        "image_data": STANDARD.encode(bytes),
    })))
}
