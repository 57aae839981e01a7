//! Session initialization: prototype URL, design file, browser, workspace.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use autoprobe_protocols::{
    normalize_node_id, BrowserDriver, DesignFile, DesignSource, ExploreError, Region,
};

use crate::workspace::TaskWorkspace;

const STARTING_NODE_PARAM: &str = "starting-point-node-id";

/// A parsed prototype link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrototypeUrl {
    pub raw: String,
    pub file_key: String,
    pub starting_node_id: String,
}

impl PrototypeUrl {
    /// Extract the file key from `/file/<key>/` or `/proto/<key>/` and the
    /// starting node from the `starting-point-node-id` query parameter.
    pub fn parse(raw: &str) -> Result<Self, ExploreError> {
        let url = Url::parse(raw.trim())
            .map_err(|e| ExploreError::Initialization(format!("invalid prototype URL: {}", e)))?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        let file_key = segments
            .iter()
            .position(|seg| *seg == "file" || *seg == "proto")
            .and_then(|i| segments.get(i + 1))
            .map(|key| key.to_string())
            .ok_or_else(|| {
                ExploreError::Initialization(format!("no file key in prototype URL: {}", raw))
            })?;

        let starting_node_id = url
            .query_pairs()
            .find(|(key, _)| key == STARTING_NODE_PARAM)
            .map(|(_, value)| normalize_node_id(&value))
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ExploreError::Initialization(format!(
                    "no {} in prototype URL: {}",
                    STARTING_NODE_PARAM, raw
                ))
            })?;

        Ok(Self {
            raw: raw.trim().to_string(),
            file_key,
            starting_node_id,
        })
    }
}

/// Parameters for [`initialize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitRequest {
    pub app: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./")
}

/// Everything a session needs to know about the prototype under test.
#[derive(Debug, Clone)]
pub struct ExplorationTarget {
    pub app: String,
    pub workspace: TaskWorkspace,
    pub design: Arc<DesignFile>,
    /// Screen region of the prototype frame within the page.
    pub region: Region,
    pub prototype: PrototypeUrl,
}

/// The app name with spaces removed, usable as a single directory name.
fn app_dir_name(raw: &str) -> Result<String, ExploreError> {
    let app = raw.replace(' ', "");
    if app.is_empty() {
        return Err(ExploreError::Initialization("app name is empty".into()));
    }
    let mut components = Path::new(&app).components();
    let single = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();
    if !single || app.contains(['/', '\\']) {
        return Err(ExploreError::Initialization(format!(
            "app name is not a plain directory name: {}",
            raw
        )));
    }
    Ok(app)
}

/// Fetch the design, open the prototype, locate the frame on the canvas,
/// and create the task workspace.
pub async fn initialize(
    request: &InitRequest,
    design_source: &dyn DesignSource,
    driver: &dyn BrowserDriver,
) -> Result<ExplorationTarget, ExploreError> {
    let app = app_dir_name(&request.app)?;
    let prototype = PrototypeUrl::parse(&request.url)?;
    debug!(
        "Prototype file {} starting at {}",
        prototype.file_key, prototype.starting_node_id
    );

    let design = design_source
        .fetch_file(&prototype.file_key, Some(&request.root_dir))
        .await
        .map_err(|e| ExploreError::Initialization(format!("failed to fetch design file: {}", e)))?;

    let frame = design
        .find_node(&prototype.starting_node_id)
        .ok_or_else(|| {
            ExploreError::Initialization(format!(
                "starting node {} not found in design file",
                prototype.starting_node_id
            ))
        })?
        .absolute_bounding_box
        .ok_or_else(|| {
            ExploreError::Initialization(format!(
                "starting node {} has no bounding box",
                prototype.starting_node_id
            ))
        })?;

    driver
        .open(&prototype.raw, request.password.as_deref())
        .await
        .map_err(|e| ExploreError::Initialization(format!("failed to open prototype: {}", e)))?;
    let canvas = driver
        .canvas_geometry()
        .await
        .map_err(|e| ExploreError::Initialization(format!("failed to locate canvas: {}", e)))?;
    let region = canvas.centered_frame(frame.width, frame.height);

    let workspace = TaskWorkspace::create(&request.root_dir, &app, Local::now()).await?;

    info!(
        "Initialized {} ({}x{} at {},{}) in {:?}",
        app, region.width, region.height, region.x, region.y, workspace.task_dir
    );

    Ok(ExplorationTarget {
        app,
        workspace,
        design: Arc::new(design),
        region,
        prototype,
    })
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
