//! Exploration session: the round state machine.
//!
//! ```text
//! Init -> RoundStart -> Deciding -> Executing -> Reflecting -> RoundStart ...
//!                          |            |            |
//!                          +-> Done     +-> Aborted  +-> Aborted
//! ```
//!
//! Every round writes its artifacts to the task directory before moving on,
//! so whatever was produced before a failure stays on disk.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use autoprobe_protocols::{
    ActionDecision, ActionKind, Annotator, BrowserDriver, ExploreError, ReflectionVerdict, Region,
    StopSignal, VisionModel,
};

use crate::decision::{ActionDecisionStage, DecisionInput};
use crate::docstore::DocumentationStore;
use crate::execution::ActionExecutionStage;
use crate::init::ExplorationTarget;
use crate::parser::ResponseParser;
use crate::reflection::{record_documentation, ReflectionInput, ReflectionStage};
use crate::registry::ElementRegistry;
use crate::report::ReportWriter;
use crate::round_log::{ExploreLogEntry, ReflectLogEntry, RoundLogWriter};
use crate::workspace::TaskWorkspace;

/// Loop settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_rounds: u32,
    /// Pause after each action and after each reflection.
    pub request_interval: Duration,
    pub dark_mode: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_rounds: 20,
            request_interval: Duration::from_secs(3),
            dark_mode: false,
        }
    }
}

/// What the operator asked for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskBrief {
    pub task_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_description: Option<String>,
}

/// State machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Init,
    RoundStart,
    Deciding,
    Executing,
    Reflecting,
    Done,
    Aborted,
}

/// Mutable exploration state, owned by one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationState {
    /// Incremented at the start of each round.
    pub round: u32,
    /// Model's running summary, reset to "None" after leaving an element.
    pub last_action: String,
    /// Elements excluded from later rounds. Only ever grows.
    pub uninteresting: HashSet<String>,
    pub task_complete: bool,
    pub docs_generated: u32,
}

impl Default for ExplorationState {
    fn default() -> Self {
        Self {
            round: 0,
            last_action: "None".to_string(),
            uninteresting: HashSet::new(),
            task_complete: false,
            docs_generated: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Incomplete,
    Error,
}

/// Result of a whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationOutcome {
    pub status: OutcomeStatus,
    pub task_complete: bool,
    pub rounds: u32,
    pub docs_generated: u32,
    pub message: String,
}

/// Collaborators a session talks to.
#[derive(Clone)]
pub struct SessionParts {
    pub model: Arc<dyn VisionModel>,
    pub parser: Arc<dyn ResponseParser>,
    pub driver: Arc<dyn BrowserDriver>,
    pub annotator: Arc<dyn Annotator>,
    pub docs: Arc<dyn DocumentationStore>,
}

enum RoundFlow {
    Next,
    Finished,
}

struct SessionLogs {
    explore: RoundLogWriter,
    reflect: RoundLogWriter,
    report: ReportWriter,
}

impl SessionLogs {
    async fn open(workspace: &TaskWorkspace) -> std::io::Result<Self> {
        Ok(Self {
            explore: RoundLogWriter::open(&workspace.explore_log()).await?,
            reflect: RoundLogWriter::open(&workspace.reflect_log()).await?,
            report: ReportWriter::open(&workspace.report()).await?,
        })
    }
}

/// One exploration run over an initialized target.
pub struct ExplorationSession {
    workspace: TaskWorkspace,
    region: Region,
    registry: ElementRegistry,
    driver: Arc<dyn BrowserDriver>,
    annotator: Arc<dyn Annotator>,
    docs: Arc<dyn DocumentationStore>,
    decision: ActionDecisionStage,
    execution: ActionExecutionStage,
    reflection: ReflectionStage,
    config: SessionConfig,
    stop: Arc<StopSignal>,
    state: ExplorationState,
    phase: SessionPhase,
}

impl ExplorationSession {
    pub fn new(
        target: &ExplorationTarget,
        parts: SessionParts,
        config: SessionConfig,
        stop: Arc<StopSignal>,
    ) -> Self {
        let region = target.region;
        Self {
            workspace: target.workspace.clone(),
            region,
            registry: ElementRegistry::new(target.design.clone()),
            decision: ActionDecisionStage::new(parts.model.clone(), parts.parser.clone()),
            execution: ActionExecutionStage::new(
                parts.driver.clone(),
                parts.annotator.clone(),
                region.origin(),
                region.width,
            ),
            reflection: ReflectionStage::new(parts.model, parts.parser),
            driver: parts.driver,
            annotator: parts.annotator,
            docs: parts.docs,
            config,
            stop,
            state: ExplorationState::default(),
            phase: SessionPhase::Init,
        }
    }

    pub fn state(&self) -> &ExplorationState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Run rounds until FINISH, the round limit, a stop request, or a failure.
    pub async fn run(&mut self, brief: &TaskBrief) -> ExplorationOutcome {
        info!(
            "Starting exploration of {} in {:?}",
            self.workspace.app, self.workspace.task_dir
        );

        let logs = match SessionLogs::open(&self.workspace).await {
            Ok(logs) => logs,
            Err(e) => return self.conclude(Err(e.into())),
        };

        let result = self.explore(&logs, brief).await;
        let outcome = self.conclude(result);

        if let Err(e) = logs.report.note(&outcome.message).await {
            warn!("Failed to write final report note: {}", e);
        }
        outcome
    }

    async fn explore(&mut self, logs: &SessionLogs, brief: &TaskBrief) -> Result<(), ExploreError> {
        logs.report
            .header(
                &self.workspace.app,
                &self.workspace.task_name,
                &brief.task_description,
                brief.persona_description.as_deref(),
            )
            .await?;

        while self.state.round < self.config.max_rounds {
            if self.stop.is_stopped() {
                info!("Exploration stopped by user request");
                return Err(ExploreError::Cancelled);
            }

            self.state.round += 1;
            if let RoundFlow::Finished = self.play_round(logs, brief).await? {
                self.state.task_complete = true;
                return Ok(());
            }
        }

        Ok(())
    }

    async fn play_round(&mut self, logs: &SessionLogs, brief: &TaskBrief) -> Result<RoundFlow, ExploreError> {
        let round = self.state.round;
        self.phase = SessionPhase::RoundStart;
        info!("Round {}", round);
        logs.report.round(round).await?;

        let before = self.workspace.before(round);
        self.driver.take_screenshot(self.region, &before).await?;
        logs.report
            .image("Before action", &TaskWorkspace::before_name(round))
            .await?;

        let node_id = self.driver.current_node_id().await?;
        let screen = self.registry.resolve(&node_id)?;
        tokio::fs::write(self.workspace.snapshot(round), serde_json::to_vec(screen)?).await?;
        let elements = self.registry.elements(screen, &self.state.uninteresting);

        let before_labeled = self.workspace.before_labeled(round);
        self.annotator
            .label_elements(&before, &before_labeled, &elements, self.config.dark_mode)?;
        logs.report
            .image(
                "Before action labeled",
                &TaskWorkspace::before_labeled_name(round),
            )
            .await?;

        self.phase = SessionPhase::Deciding;
        let decision = self
            .decision
            .decide(DecisionInput {
                task_description: &brief.task_description,
                persona_description: brief.persona_description.as_deref(),
                last_action: &self.state.last_action,
                image: &before_labeled,
            })
            .await?;
        logs.explore
            .write(&ExploreLogEntry {
                step: round,
                prompt: decision.prompt.clone(),
                image: TaskWorkspace::before_labeled_name(round),
                response: decision.response.clone(),
            })
            .await?;
        logs.report.decision(&decision.parsed).await?;
        self.state.last_action = decision.parsed.summary.clone();

        let action = decision.checked_action(elements.len())?;
        match action {
            ActionDecision::Finish => {
                info!("Model reported the task complete");
                self.phase = SessionPhase::Done;
                return Ok(RoundFlow::Finished);
            }
            ActionDecision::Text { input } => {
                info!("Text input {:?} is not performed on the prototype", input);
                self.pause().await;
                return Ok(RoundFlow::Next);
            }
            ActionDecision::Tap { .. }
            | ActionDecision::LongPress { .. }
            | ActionDecision::Swipe { .. } => {}
            ActionDecision::Undefined { raw } => {
                return Err(ExploreError::ProtocolViolation(format!(
                    "undefined action: {:?}",
                    raw
                )));
            }
        }

        self.phase = SessionPhase::Executing;
        let marked = self.workspace.before_labeled_action(round);
        let executed = self
            .execution
            .execute(action, &elements, &before, &marked)
            .await?;
        logs.report
            .image(
                "Before action labeled actioned",
                &TaskWorkspace::before_labeled_action_name(round),
            )
            .await?;
        self.pause().await;

        let after = self.workspace.after(round);
        self.driver.take_screenshot(self.region, &after).await?;
        let after_labeled = self.workspace.after_labeled(round);
        self.annotator
            .label_elements(&after, &after_labeled, &elements, self.config.dark_mode)?;

        self.phase = SessionPhase::Reflecting;
        let reflection = self
            .reflection
            .reflect(ReflectionInput {
                element_index: executed.index,
                kind: executed.kind,
                task_description: &brief.task_description,
                persona_description: brief.persona_description.as_deref(),
                last_action: &self.state.last_action,
                before_image: &before_labeled,
                after_image: &after_labeled,
            })
            .await?;
        logs.reflect
            .write(&ReflectLogEntry {
                step: round,
                prompt: reflection.prompt.clone(),
                image_before: TaskWorkspace::before_labeled_name(round),
                image_after: TaskWorkspace::after_labeled_name(round),
                response: reflection.response.clone(),
            })
            .await?;
        logs.report.reflection(&reflection.parsed).await?;

        self.apply_verdict(&executed.element.uid, executed.kind, &reflection.parsed.verdict)
            .await?;
        self.pause().await;

        Ok(RoundFlow::Next)
    }

    async fn apply_verdict(
        &mut self,
        uid: &str,
        kind: ActionKind,
        verdict: &ReflectionVerdict,
    ) -> Result<(), ExploreError> {
        match verdict {
            ReflectionVerdict::Error(reason) => {
                return Err(ExploreError::Reflection(reason.clone()));
            }
            ReflectionVerdict::Back(_) => self.driver.back().await?,
            ReflectionVerdict::Ineffective
            | ReflectionVerdict::Continue(_)
            | ReflectionVerdict::Success(_) => {}
        }

        if verdict.marks_uninteresting() {
            self.state.uninteresting.insert(uid.to_string());
            self.state.last_action = "None".to_string();
        }

        if let Some(doc) = verdict.documentation() {
            if record_documentation(self.docs.as_ref(), uid, kind, doc).await? {
                self.state.docs_generated += 1;
            }
        }

        Ok(())
    }

    async fn pause(&self) {
        if !self.config.request_interval.is_zero() {
            tokio::time::sleep(self.config.request_interval).await;
        }
    }

    fn conclude(&mut self, result: Result<(), ExploreError>) -> ExplorationOutcome {
        let docs = self.state.docs_generated;
        let (status, message) = match result {
            Ok(()) if self.state.task_complete => {
                self.phase = SessionPhase::Done;
                (
                    OutcomeStatus::Success,
                    format!(
                        "Autonomous exploration completed successfully. {} docs generated.",
                        docs
                    ),
                )
            }
            Ok(()) => {
                self.phase = SessionPhase::Done;
                (
                    OutcomeStatus::Incomplete,
                    format!(
                        "Autonomous exploration finished due to reaching max rounds. {} docs generated.",
                        docs
                    ),
                )
            }
            Err(ExploreError::Cancelled) => {
                self.phase = SessionPhase::Aborted;
                (
                    OutcomeStatus::Incomplete,
                    format!(
                        "Autonomous exploration stopped by user request. {} docs generated.",
                        docs
                    ),
                )
            }
            Err(e) => {
                self.phase = SessionPhase::Aborted;
                error!("Exploration aborted ({}): {}", e.category(), e);
                (
                    OutcomeStatus::Error,
                    format!(
                        "Autonomous exploration finished unexpectedly: {}. {} docs generated.",
                        e, docs
                    ),
                )
            }
        };

        info!(
            "Exploration ended after {} rounds with status {:?}",
            self.state.round, status
        );

        ExplorationOutcome {
            status,
            task_complete: self.state.task_complete,
            rounds: self.state.round,
            docs_generated: docs,
            message,
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
