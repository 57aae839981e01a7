//! Session controller: owns the initialized target and at most one
//! background exploration worker.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use autoprobe_protocols::{
    Annotator, BrowserDriver, DesignSource, DriverError, DriverFactory, ExploreError, StopSignal,
    VisionModel,
};

use crate::docstore::FileDocumentationStore;
use crate::init::{initialize, ExplorationTarget, InitRequest};
use crate::parser::ResponseParser;
use crate::session::{ExplorationOutcome, ExplorationSession, SessionConfig, SessionParts, TaskBrief};
use crate::workspace::TaskWorkspace;

/// Controller errors.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Exploration already in progress")]
    AlreadyRunning,

    #[error("Session not initialized")]
    NotInitialized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Init(#[from] ExploreError),

    #[error("Driver failure: {0}")]
    Driver(#[from] DriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Long-lived collaborators shared by every session.
#[derive(Clone)]
pub struct ControllerServices {
    pub model: Arc<dyn VisionModel>,
    pub parser: Arc<dyn ResponseParser>,
    pub design_source: Arc<dyn DesignSource>,
    pub driver_factory: Arc<dyn DriverFactory>,
    pub annotator: Arc<dyn Annotator>,
}

/// Returned by [`SessionController::initialize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitSummary {
    pub app: String,
    pub task_name: String,
    pub task_dir: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    InProgress,
    Idle,
}

/// Snapshot for status queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationStatus {
    pub state: RunState,
    pub initialized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<ExplorationOutcome>,
}

struct Initialized {
    target: ExplorationTarget,
    driver: Arc<dyn BrowserDriver>,
}

#[derive(Default)]
struct ControllerState {
    initialized: Option<Initialized>,
    worker: Option<JoinHandle<()>>,
    /// Kept after stop so the report and images stay reachable.
    last_workspace: Option<TaskWorkspace>,
}

impl ControllerState {
    fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn workspace(&self) -> Option<&TaskWorkspace> {
        self.initialized
            .as_ref()
            .map(|i| &i.target.workspace)
            .or(self.last_workspace.as_ref())
    }
}

/// Runs exploration sessions on behalf of the control surface and CLI.
pub struct SessionController {
    services: ControllerServices,
    config: SessionConfig,
    stop_timeout: Duration,
    state: Mutex<ControllerState>,
    stop: Arc<StopSignal>,
    last_outcome: Arc<RwLock<Option<ExplorationOutcome>>>,
}

impl SessionController {
    pub fn new(services: ControllerServices, config: SessionConfig) -> Self {
        Self {
            services,
            config,
            stop_timeout: Duration::from_secs(10),
            state: Mutex::new(ControllerState::default()),
            stop: Arc::new(StopSignal::new()),
            last_outcome: Arc::new(RwLock::new(None)),
        }
    }

    /// How long `stop` waits for the worker before aborting it.
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Open a browser and prepare a target for exploration.
    ///
    /// Replaces any previous initialization.
    pub async fn initialize(&self, request: InitRequest) -> Result<InitSummary, ControllerError> {
        let previous = {
            let mut state = self.state.lock().await;
            if state.is_running() {
                return Err(ControllerError::AlreadyRunning);
            }
            state.initialized.take()
        };
        if let Some(previous) = previous {
            close_driver(previous.driver.as_ref()).await;
        }

        // Browser start-up and page load run without the state lock so
        // status and stop requests are served meanwhile.
        let driver = self.services.driver_factory.create().await.map_err(|e| {
            ExploreError::Initialization(format!("failed to start browser: {}", e))
        })?;
        let target = match initialize(
            &request,
            self.services.design_source.as_ref(),
            driver.as_ref(),
        )
        .await
        {
            Ok(target) => target,
            Err(e) => {
                error!("Initialization failed: {}", e);
                close_driver(driver.as_ref()).await;
                return Err(e.into());
            }
        };

        let summary = InitSummary {
            app: target.app.clone(),
            task_name: target.workspace.task_name.clone(),
            task_dir: target.workspace.task_dir.display().to_string(),
            x: target.region.x,
            y: target.region.y,
            width: target.region.width,
            height: target.region.height,
        };

        let displaced = {
            let mut state = self.state.lock().await;
            if state.is_running() {
                None
            } else {
                state.last_workspace = Some(target.workspace.clone());
                Some(state.initialized.replace(Initialized {
                    target,
                    driver: driver.clone(),
                }))
            }
        };
        match displaced {
            // A concurrent initialization won and already started a run.
            None => {
                close_driver(driver.as_ref()).await;
                Err(ControllerError::AlreadyRunning)
            }
            Some(displaced) => {
                if let Some(displaced) = displaced {
                    close_driver(displaced.driver.as_ref()).await;
                }
                Ok(summary)
            }
        }
    }

    /// Start a background exploration of the initialized target.
    pub async fn start(&self, brief: TaskBrief) -> Result<(), ControllerError> {
        let mut state = self.state.lock().await;
        if state.is_running() {
            return Err(ControllerError::AlreadyRunning);
        }
        let initialized = state
            .initialized
            .as_ref()
            .ok_or(ControllerError::NotInitialized)?;

        self.stop.reset();
        let parts = SessionParts {
            model: self.services.model.clone(),
            parser: self.services.parser.clone(),
            driver: initialized.driver.clone(),
            annotator: self.services.annotator.clone(),
            docs: Arc::new(FileDocumentationStore::new(
                initialized.target.workspace.docs_dir.clone(),
            )),
        };
        let mut session = ExplorationSession::new(
            &initialized.target,
            parts,
            self.config.clone(),
            self.stop.clone(),
        );
        let last_outcome = self.last_outcome.clone();

        info!("Starting exploration: {}", brief.task_description);
        state.worker = Some(tokio::spawn(async move {
            let outcome = session.run(&brief).await;
            info!("{}", outcome.message);
            *last_outcome.write() = Some(outcome);
        }));
        Ok(())
    }

    /// Stop the worker, close the browser and drop the initialization.
    ///
    /// The worker gets `stop_timeout` to finish its current round before it
    /// is aborted.
    pub async fn stop(&self) -> Result<(), ControllerError> {
        // Raised under the state lock so a queued `start` cannot clear it.
        let (worker, initialized) = {
            let mut state = self.state.lock().await;
            self.stop.stop();
            (state.worker.take(), state.initialized.take())
        };

        if let Some(mut handle) = worker {
            match tokio::time::timeout(self.stop_timeout, &mut handle).await {
                Ok(Ok(())) => info!("Exploration worker stopped"),
                Ok(Err(e)) => error!("Exploration worker failed: {}", e),
                Err(_) => {
                    warn!(
                        "Exploration worker did not stop within {:?}, aborting",
                        self.stop_timeout
                    );
                    handle.abort();
                }
            }
        }

        if let Some(initialized) = initialized {
            initialized.driver.close().await?;
        }
        Ok(())
    }

    /// Ask the worker to finish after its current round without waiting.
    pub fn request_stop(&self) {
        self.stop.stop();
    }

    /// Wait for the current worker, if any, to finish on its own.
    pub async fn wait(&self) -> Option<ExplorationOutcome> {
        let worker = self.state.lock().await.worker.take();
        if let Some(handle) = worker {
            if let Err(e) = handle.await {
                error!("Exploration worker failed: {}", e);
            }
        }
        self.last_outcome()
    }

    pub async fn status(&self) -> ExplorationStatus {
        let state = self.state.lock().await;
        ExplorationStatus {
            state: if state.is_running() {
                RunState::InProgress
            } else {
                RunState::Idle
            },
            initialized: state.initialized.is_some(),
            last_outcome: self.last_outcome(),
        }
    }

    pub fn last_outcome(&self) -> Option<ExplorationOutcome> {
        self.last_outcome.read().clone()
    }

    /// Markdown report of the current or most recent task.
    pub async fn report(&self) -> Result<String, ControllerError> {
        let path = {
            let state = self.state.lock().await;
            state
                .workspace()
                .ok_or_else(|| ControllerError::NotFound("no exploration task".into()))?
                .report()
        };
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| not_found_or_io(e, "report not available"))
    }

    /// Bytes of an artifact in the task directory.
    pub async fn image(&self, file_path: &str) -> Result<Vec<u8>, ControllerError> {
        let path = {
            let state = self.state.lock().await;
            let workspace = state
                .workspace()
                .ok_or_else(|| ControllerError::NotFound("no exploration task".into()))?;
            workspace
                .resolve_artifact(file_path)
                .ok_or_else(|| ControllerError::InvalidPath(file_path.to_string()))?
        };
        tokio::fs::read(&path)
            .await
            .map_err(|e| not_found_or_io(e, file_path))
    }
}

async fn close_driver(driver: &dyn BrowserDriver) {
    if let Err(e) = driver.close().await {
        warn!("Failed to close browser: {}", e);
    }
}

fn not_found_or_io(e: std::io::Error, what: &str) -> ControllerError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ControllerError::NotFound(what.to_string())
    } else {
        ControllerError::Io(e)
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
