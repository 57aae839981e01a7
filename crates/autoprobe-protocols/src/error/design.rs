//! Design-file service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("Design API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid design file: {0}")]
    InvalidFile(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
