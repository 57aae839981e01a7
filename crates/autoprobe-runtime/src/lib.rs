//! # AutoProbe Runtime
//!
//! The exploration loop: element registry, decision, execution and
//! reflection stages, documentation store, and the session that drives
//! them round by round.

pub mod controller;
pub mod decision;
pub mod docstore;
pub mod execution;
pub mod init;
pub mod parser;
pub mod prompts;
pub mod reflection;
pub mod registry;
pub mod report;
pub mod round_log;
pub mod session;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{
    ControllerError, ControllerServices, ExplorationStatus, InitSummary, RunState, SessionController,
};
pub use decision::{ActionDecisionStage, DecisionInput, DecisionOutput};
pub use docstore::{
    DocStoreError, DocumentationStore, FileDocumentationStore, MemoryDocumentationStore,
};
pub use execution::{ActionExecutionStage, ExecutedAction};
pub use init::{initialize, ExplorationTarget, InitRequest, PrototypeUrl};
pub use parser::{LabeledResponseParser, ParsedDecision, ParsedReflection, ResponseParser};
pub use reflection::{record_documentation, ReflectionInput, ReflectionOutput, ReflectionStage};
pub use registry::ElementRegistry;
pub use report::ReportWriter;
pub use round_log::{ExploreLogEntry, ReflectLogEntry, RoundLogWriter};
pub use session::{
    ExplorationOutcome, ExplorationSession, ExplorationState, OutcomeStatus, SessionConfig,
    SessionParts, SessionPhase, TaskBrief,
};
pub use workspace::TaskWorkspace;
