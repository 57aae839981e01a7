//! Exploration errors.
//!
//! Every variant except [`ExploreError::Cancelled`] ends the session with an
//! error outcome. None of them is retried.

use thiserror::Error;

use super::{AnnotateError, DesignError, DriverError, ModelError};

#[derive(Debug, Error)]
pub enum ExploreError {
    /// Missing or invalid remote resource, bad prototype URL, unresolvable starting node.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Model output that cannot be mapped onto the action grammar, or an
    /// element index outside the current element list.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// Gesture or screenshot failure.
    #[error("Driver failure: {0}")]
    Driver(#[from] DriverError),

    /// The decision call itself failed.
    #[error("Model failure: {0}")]
    Model(#[from] ModelError),

    /// The model reported ERROR, or the reflection call failed.
    #[error("Reflection error: {0}")]
    Reflection(String),

    /// The current screen could not be resolved to a design node.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Design error: {0}")]
    Design(#[from] DesignError),

    #[error("Annotation failed: {0}")]
    Annotate(#[from] AnnotateError),

    #[error("Documentation store error: {0}")]
    Documentation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// External stop request observed at a round boundary.
    #[error("Exploration stopped by user request")]
    Cancelled,
}

impl ExploreError {
    /// Short machine-readable category, used in logs and API responses.
    pub fn category(&self) -> &'static str {
        match self {
            ExploreError::Initialization(_) | ExploreError::Design(_) => "initialization",
            ExploreError::ProtocolViolation(_) => "protocol_violation",
            ExploreError::Driver(_) => "driver_failure",
            ExploreError::Model(_) => "model_failure",
            ExploreError::Reflection(_) => "reflection_error",
            ExploreError::NodeNotFound(_) => "node_not_found",
            ExploreError::Annotate(_)
            | ExploreError::Documentation(_)
            | ExploreError::Io(_)
            | ExploreError::Serialization(_) => "artifact_failure",
            ExploreError::Cancelled => "cancelled",
        }
    }
}
