//! Image annotation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("Failed to load image {path}: {message}")]
    Load { path: String, message: String },

    #[error("Failed to save image {path}: {message}")]
    Save { path: String, message: String },

    #[error("Failed to load label font: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
